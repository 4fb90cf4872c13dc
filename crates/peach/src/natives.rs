//! Native functions installed into every VM at startup.

use std::sync::OnceLock;
use std::time::Instant;

use crate::value::Value;
use crate::vm::Vm;

/// The instant the first VM in this process came up; `clock` measures from
/// here so its result is nonnegative and nondecreasing.
static START: OnceLock<Instant> = OnceLock::new();

pub(crate) fn install(vm: &mut Vm) {
    START.get_or_init(Instant::now);
    vm.define_native("clock", clock);
}

/// `clock()` — elapsed seconds as a number. Ignores its arguments.
///
/// Deliberately wall-clock (`Instant`) rather than process CPU time:
/// `Instant` is portable and the observable contract is only a
/// nonnegative, nondecreasing number (see DESIGN.md decision 9).
fn clock(_args: &[Value]) -> Value {
    let start = START.get_or_init(Instant::now);
    Value::Number(start.elapsed().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_nonnegative_and_monotonic() {
        install(&mut Vm::new());
        let Value::Number(first) = clock(&[]) else {
            panic!("clock should return a number");
        };
        let Value::Number(second) = clock(&[]) else {
            panic!("clock should return a number");
        };
        assert!(first >= 0.0);
        assert!(second >= first);
    }
}
