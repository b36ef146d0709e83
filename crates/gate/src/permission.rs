/// Inputs of one run-permission evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInputs<K> {
	/// Upstream data is not ready yet (passed down by the parent level).
	pub serial_loading: bool,
	/// The local identity/session is not resolved yet.
	pub identity_loading: bool,
	/// Primary parameter of the fetch; absent until upstream produces it.
	pub required_key: Option<K>,
	/// The target entity was deleted by this session.
	pub is_removed: bool,
}

impl<K: RequiredKey> RunInputs<K> {
	pub fn readiness(&self) -> Readiness {
		Readiness {
			serial_loading: self.serial_loading,
			identity_loading: self.identity_loading,
			key_present: self.required_key.is_present(),
			is_removed: self.is_removed,
		}
	}
}

/// Returns true iff the fetch may run: upstream and identity are ready, the
/// key is present, and the entity has not been removed.
pub fn compute_run_permission<K: RequiredKey>(inputs: &RunInputs<K>) -> bool {
	!inputs.serial_loading && !inputs.identity_loading && inputs.required_key.is_present() && !inputs.is_removed
}

/// Key-erased form of [`RunInputs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
	pub serial_loading: bool,
	pub identity_loading: bool,
	pub key_present: bool,
	pub is_removed: bool,
}

impl Readiness {
	pub fn permits(&self) -> bool {
		self.blocked_by().is_none()
	}

	/// First unmet condition, in evaluation order.
	pub fn blocked_by(&self) -> Option<BlockReason> {
		if self.serial_loading {
			Some(BlockReason::UpstreamLoading)
		} else if self.identity_loading {
			Some(BlockReason::IdentityLoading)
		} else if !self.key_present {
			Some(BlockReason::MissingKey)
		} else if self.is_removed {
			Some(BlockReason::Removed)
		} else {
			None
		}
	}

	pub fn decide(&self) -> GateDecision {
		let blocked_by = self.blocked_by();
		GateDecision {
			enabled: blocked_by.is_none(),
			blocked_by,
		}
	}
}

/// Why a fetch was held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockReason {
	UpstreamLoading,
	IdentityLoading,
	MissingKey,
	Removed,
}

impl BlockReason {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::UpstreamLoading => "upstream loading",
			Self::IdentityLoading => "identity loading",
			Self::MissingKey => "missing key",
			Self::Removed => "removed",
		}
	}
}

impl std::fmt::Display for BlockReason {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
	/// Value for the fetch's `enabled` flag.
	pub enabled: bool,
	/// First unmet condition when not enabled.
	pub blocked_by: Option<BlockReason>,
}

/// OR of a level's own loading state and every upstream `serial_loading`.
pub fn composite_loading(own: bool, upstream: impl IntoIterator<Item = bool>) -> bool {
	own || upstream.into_iter().any(|loading| loading)
}

/// Whether a fetch key carries a usable value.
///
/// Strings are present when non-empty; `Option` when `Some` of a present
/// value. Integer ids are always present, absence is expressed with `Option`.
pub trait RequiredKey {
	fn is_present(&self) -> bool;
}

impl RequiredKey for str {
	fn is_present(&self) -> bool {
		!self.is_empty()
	}
}

impl RequiredKey for String {
	fn is_present(&self) -> bool {
		!self.is_empty()
	}
}

impl<T: RequiredKey + ?Sized> RequiredKey for &T {
	fn is_present(&self) -> bool {
		(**self).is_present()
	}
}

impl<T: RequiredKey> RequiredKey for Option<T> {
	fn is_present(&self) -> bool {
		self.as_ref().is_some_and(|key| key.is_present())
	}
}

macro_rules! always_present {
	($($ty:ty),* $(,)?) => {
		$(
			impl RequiredKey for $ty {
				fn is_present(&self) -> bool {
					true
				}
			}
		)*
	};
}

always_present!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
