//! Flag-gated branch primitives.
//!
//! Both functions answer "where does the cursor go?" without touching the
//! dispatch loop. The returned index is where the instruction pointer is
//! parked; the loop's regular `+1` advance then resumes execution on the
//! cell after it.

use std::cmp::Ordering;

use crate::tape::Tape;

const JUMP: u8 = 3;
const LOOP: u8 = 9;

/// JUMP (`3`): with the flag set, park on the next `3` to the right.
pub fn jump_target(tape: &Tape, ip: usize, flag: bool) -> Option<usize> {
    if !flag {
        return None;
    }
    tape.find_after(ip, JUMP)
}

/// LOOP (`9`): with the flag set, jump back to an earlier run of 9s with the
/// same length as the run ending at `ip`.
///
/// Only the rightmost 9 of a run triggers. Scanning leftwards, shorter runs
/// are passed over, a longer run aborts the search, and an equal run is the
/// match: the result is the index of that run's last 9. A run that reaches
/// the first cell of the tape has no left boundary and never matches.
pub fn loop_target(tape: &Tape, ip: usize, flag: bool) -> Option<usize> {
    if !flag {
        return None;
    }

    let ip = isize::try_from(ip).ok()?;
    if tape.read(ip) != LOOP || tape.read(ip + 1) == LOOP {
        return None;
    }

    let mut closing: isize = 1;
    while tape.read(ip - closing) == LOOP {
        closing += 1;
    }

    let mut candidate: isize = 0;
    for j in (0..=ip - closing).rev() {
        if tape.read(j) == LOOP {
            candidate += 1;
            continue;
        }
        if candidate == 0 {
            continue;
        }
        match candidate.cmp(&closing) {
            Ordering::Equal => return usize::try_from(j + candidate).ok(),
            Ordering::Greater => return None,
            Ordering::Less => candidate = 0,
        }
    }

    None
}
