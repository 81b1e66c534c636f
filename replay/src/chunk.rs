use std::collections::BTreeMap;

use crate::Timestamp;

/// Metadata for one downloaded segment of the recording.
///
/// The sequence is the chunk's identity: once a sequence has been seen, its
/// time range never changes, so later snapshots only ever add new sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chunk {
	pub sequence: u64,
	pub start: Timestamp,
	pub duration: Timestamp,
}

impl Chunk {
	pub fn new(sequence: u64, start: Timestamp, duration: Timestamp) -> Self {
		Self {
			sequence,
			start,
			duration,
		}
	}

	pub fn end(&self) -> Timestamp {
		self.start + self.duration
	}
}

/// The accumulated chunk metadata for one recording, ordered by sequence.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
	chunks: BTreeMap<u64, Chunk>,
}

impl Timeline {
	pub fn new() -> Self {
		Self::default()
	}

	/// Merge a snapshot, returning how many chunks were new.
	///
	/// Sequences already present are ignored, making re-fetched snapshots safe.
	pub fn merge<I: IntoIterator<Item = Chunk>>(&mut self, chunks: I) -> usize {
		let mut added = 0;

		for chunk in chunks {
			self.chunks.entry(chunk.sequence).or_insert_with(|| {
				added += 1;
				chunk
			});
		}

		added
	}

	pub fn count(&self) -> usize {
		self.chunks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chunks.is_empty()
	}

	/// End of the last known chunk; zero while the timeline is empty.
	pub fn duration(&self) -> Timestamp {
		self.chunks
			.values()
			.next_back()
			.map(Chunk::end)
			.unwrap_or_default()
	}

	/// The earliest valid seek target.
	pub fn valid_start(&self) -> Timestamp {
		self.chunks
			.values()
			.next()
			.map(|chunk| chunk.start)
			.unwrap_or_default()
	}

	/// The latest valid seek target given current buffering: the end of the
	/// contiguous run of sequences starting at the first chunk.
	pub fn valid_end(&self) -> Timestamp {
		let mut end = Timestamp::ZERO;
		let mut next = match self.chunks.keys().next() {
			Some(first) => *first,
			None => return end,
		};

		for chunk in self.chunks.values() {
			if chunk.sequence != next {
				break;
			}

			end = chunk.end();
			next = chunk.sequence + 1;
		}

		end
	}
}
