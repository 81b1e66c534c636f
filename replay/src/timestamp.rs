use std::fmt;

use derive_more::{Add, AddAssign, Sub, SubAssign, Sum};

/// A position on the recording timeline, stored with microsecond precision.
#[derive(
	Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Add, AddAssign, Sub, SubAssign, Sum,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
	micros: u64,
}

impl Timestamp {
	pub const ZERO: Self = Self { micros: 0 };

	pub fn from_micros(micros: u64) -> Self {
		Self { micros }
	}

	pub fn from_millis(millis: u64) -> Self {
		Self { micros: millis * 1_000 }
	}

	pub fn from_seconds(seconds: u64) -> Self {
		Self {
			micros: seconds * 1_000_000,
		}
	}

	/// Negative and non-finite inputs clamp to zero.
	pub fn from_seconds_f64(seconds: f64) -> Self {
		if !seconds.is_finite() {
			return Self::ZERO;
		}

		Self {
			micros: (seconds.max(0.0) * 1_000_000.0) as u64,
		}
	}

	pub fn as_micros(&self) -> u64 {
		self.micros
	}

	pub fn as_millis(&self) -> u64 {
		self.micros / 1_000
	}

	pub fn as_seconds(&self) -> u64 {
		self.micros / 1_000_000
	}

	pub fn as_seconds_f64(&self) -> f64 {
		self.micros as f64 / 1_000_000.0
	}

	pub fn saturating_sub(self, other: Self) -> Self {
		Self {
			micros: self.micros.saturating_sub(other.micros),
		}
	}
}

// Renders the zero-padded wall-clock form used by transport displays.
impl fmt::Display for Timestamp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let hours = self.micros / 3_600_000_000;
		let minutes = (self.micros % 3_600_000_000) / 60_000_000;
		let seconds = (self.micros % 60_000_000) / 1_000_000;

		write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
	}
}

impl fmt::Debug for Timestamp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let millis = (self.micros % 1_000_000) / 1_000;
		write!(f, "{}.{:03}", self, millis)
	}
}
