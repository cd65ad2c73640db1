//! Alarm buzzer sequencing.
//!
//! `soundAlarm(beeps)` in `original_source/alarms.h` is non-blocking per
//! beep (`tone()` fires the piezo and returns immediately; the hardware
//! timer silences it after the duration) but still calls `delay(300)`
//! between beeps, which blocks the whole control loop for up to 1.5 s on a
//! 5-beep ATO timeout alarm. That's long enough to miss a button edge or a
//! float-switch transition, so this is re-expressed as a tick-based
//! sequencer the way the teacher's LED pattern engine advances a phase
//! counter once per control cycle instead of blocking.

use crate::app::ports::BuzzerPort;

const BEEP_FREQ_HZ: u32 = 2000;
const BEEP_ON_MS: u32 = 200;
const BEEP_PERIOD_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Beeping { remaining: u8, elapsed_ms: u32 },
}

pub struct BuzzerSequencer {
    phase: Phase,
}

impl BuzzerSequencer {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    /// Queue `beeps` beeps at the standard alarm cadence (spec §7: 2/3/5
    /// beeps for differential/reservoir/ATO-timeout respectively).
    pub fn queue(&mut self, beeps: u8) {
        if beeps == 0 {
            return;
        }
        self.phase = Phase::Beeping {
            remaining: beeps,
            elapsed_ms: 0,
        };
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Advance the sequencer by `delta_ms`, firing a tone at the start of
    /// each beep period.
    pub fn tick(&mut self, delta_ms: u32, buzzer: &mut impl BuzzerPort, silenced: bool) {
        let Phase::Beeping {
            remaining,
            elapsed_ms,
        } = self.phase
        else {
            return;
        };

        if elapsed_ms == 0 && !silenced {
            let _ = buzzer.tone(BEEP_FREQ_HZ, BEEP_ON_MS);
        }

        let next = elapsed_ms + delta_ms;
        if next >= BEEP_PERIOD_MS {
            self.phase = if remaining > 1 {
                Phase::Beeping {
                    remaining: remaining - 1,
                    elapsed_ms: 0,
                }
            } else {
                Phase::Idle
            };
        } else {
            self.phase = Phase::Beeping {
                remaining,
                elapsed_ms: next,
            };
        }
    }
}

impl Default for BuzzerSequencer {
    fn default() -> Self {
        Self::new()
    }
}
