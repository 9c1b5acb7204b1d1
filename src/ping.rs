//! Grouping ping-associated records into whole pings.
//!
//! Records belonging to one acoustic ping arrive back to back, each carrying
//! the ping number. The assembler accumulates them in the store until a
//! record from a different ping shows up, then decides whether the
//! accumulation is worth emitting: a ping is complete if and only if a raw
//! detection or segmented raw detection was seen. The record that revealed
//! the ping change is pushed back to the framer so the next read starts the
//! next ping with it.

use crate::record::RecordType;

/// What the reader should do with an incoming ping-associated record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PingStep {
    /// A new accumulation begins with this record: clear the ping flags,
    /// then decode it.
    Start,
    /// The record belongs to the current accumulation: decode it.
    Accumulate,
    /// The current accumulation is complete. Push the record back, emit the
    /// ping; the pushed-back record starts the next accumulation.
    Flush,
    /// The current accumulation is incomplete and the ping moved on: drop
    /// the partial ping, clear the flags, and start over with this record.
    Restart,
}

/// The ping-grouping state machine.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PingAssembler {
    /// Ping number of the last fully-emitted ping.
    current_ping: Option<u32>,
    /// Ping number being accumulated.
    last_ping: Option<u32>,
}

impl PingAssembler {
    pub fn new() -> PingAssembler {
        PingAssembler::default()
    }

    /// The ping number of the last emitted ping.
    pub fn current_ping(&self) -> Option<u32> {
        self.current_ping
    }

    /// True while records are being accumulated.
    pub fn accumulating(&self) -> bool {
        self.last_ping.is_some()
    }

    /// Decides what to do with a ping-associated record.
    ///
    /// `ping_number` is `None` for beam geometry, which carries no ping
    /// number and inherits the accumulating ping. `complete` is the current
    /// completion test result.
    pub fn step_ping(&mut self, ping_number: Option<u32>, complete: bool) -> PingStep {
        let Some(last) = self.last_ping else {
            if let Some(new) = ping_number {
                self.last_ping = Some(new);
                return PingStep::Start;
            }
            // beam geometry before any ping; take it as-is
            return PingStep::Accumulate;
        };
        let Some(new) = ping_number else {
            return PingStep::Accumulate;
        };
        if new == last {
            return PingStep::Accumulate;
        }
        if complete {
            self.current_ping = Some(last);
            self.last_ping = None;
            PingStep::Flush
        } else {
            self.last_ping = Some(new);
            PingStep::Restart
        }
    }

    /// Applies the forced completion test for non-ping records.
    ///
    /// Returns true when a complete accumulation should be flushed before
    /// the non-ping record is handed to the caller.
    pub fn force_completion(&mut self, complete: bool) -> bool {
        if self.last_ping.is_some() && complete {
            self.current_ping = self.last_ping.take();
            true
        } else {
            false
        }
    }

    /// Flushes at end of input, if something complete is buffered.
    pub fn finish(&mut self, complete: bool) -> bool {
        self.force_completion(complete)
    }
}

/// Reads the ping number out of a raw ping-record frame.
///
/// Every ping-associated payload leads with the sonar serial number and the
/// ping number, so the assembler can group records without decoding them.
/// Beam geometry is the exception; it has no ping number.
pub(crate) fn peek_ping_number(record_type: RecordType, frame: &[u8]) -> Option<u32> {
    if !record_type.is_ping_record() || record_type == RecordType::BeamGeometry {
        return None;
    }
    frame
        .get(72..76)
        .map(|bytes| u32::from_le_bytes(bytes.try_into().unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_one_ping_then_flushes() {
        let mut assembler = PingAssembler::new();
        assert_eq!(PingStep::Start, assembler.step_ping(Some(10), false));
        assert_eq!(PingStep::Accumulate, assembler.step_ping(Some(10), false));
        // beam geometry inherits
        assert_eq!(PingStep::Accumulate, assembler.step_ping(None, false));
        // ping 11 arrives with a complete ping 10 buffered
        assert_eq!(PingStep::Flush, assembler.step_ping(Some(11), true));
        assert_eq!(Some(10), assembler.current_ping());
        assert!(!assembler.accumulating());
        // the pushed-back record comes around again
        assert_eq!(PingStep::Start, assembler.step_ping(Some(11), false));
    }

    #[test]
    fn incomplete_ping_is_dropped() {
        let mut assembler = PingAssembler::new();
        assembler.step_ping(Some(10), false);
        assert_eq!(PingStep::Restart, assembler.step_ping(Some(11), false));
        assert_eq!(None, assembler.current_ping());
        assert!(assembler.accumulating());
    }

    #[test]
    fn forced_completion_only_fires_when_complete() {
        let mut assembler = PingAssembler::new();
        assembler.step_ping(Some(10), false);
        assert!(!assembler.force_completion(false));
        assert!(assembler.accumulating());
        assert!(assembler.force_completion(true));
        assert!(!assembler.accumulating());
        assert_eq!(Some(10), assembler.current_ping());
    }

    #[test]
    fn peeks_ping_number_at_fixed_offset() {
        let mut frame = vec![0u8; 80];
        frame[72..76].copy_from_slice(&42u32.to_le_bytes());
        assert_eq!(
            Some(42),
            peek_ping_number(RecordType::RawDetection, &frame)
        );
        assert_eq!(None, peek_ping_number(RecordType::BeamGeometry, &frame));
        assert_eq!(None, peek_ping_number(RecordType::Position, &frame));
    }
}
