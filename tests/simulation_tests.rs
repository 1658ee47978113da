// tests/simulation_tests.rs

use proptest::prelude::*;
use qf::core::QfError;
use qf::vm::{interpret, InterpreterOptions, Program, RunStatus};

const TEST_TOLERANCE: f64 = 1e-9;

/// Balanced programs over the full command set (without inline operands).
fn balanced_program() -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(vec!['>', '<', '+', '~', '-', 'x', '@', ':', ',', ';', '?', '!', 'H', 'T', 'D', 'X', 'C'])
        .prop_map(|c| c.to_string());
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(|parts| parts.concat()),
            inner.prop_map(|body| format!("[{}]", body)),
        ]
    })
}

/// Programs without loops or random jumps: every token executes exactly once.
fn straight_line_program() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!['>', '<', '+', '~', '-', 'x', '@', ':', ',', ';', '?', '!']),
        0..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn balanced_programs_always_resolve(text in balanced_program()) {
        let program = Program::parse(&text, false).map_err(|e| TestCaseError::fail(e.to_string()))?;
        for &(open, close) in program.brackets().pairs() {
            prop_assert!(open < close);
            prop_assert_eq!(program.brackets().matching(open), Some(close));
            prop_assert_eq!(program.brackets().matching(close), Some(open));
        }
        let opens = text.chars().filter(|&c| c == '[').count();
        prop_assert_eq!(program.brackets().pairs().len(), opens);
    }

    #[test]
    fn pointer_stays_in_register(
        moves in prop::collection::vec(prop::sample::select(vec!['>', '<', '!']), 0..64),
        size in 1usize..6,
        seed in any::<u64>(),
    ) {
        let text: String = moves.into_iter().collect();
        let report = interpret(&text, size, InterpreterOptions::default().with_seed(seed))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(report.history.sequence().iter().all(|s| s.pointer < size));
        prop_assert!(report.final_pointer < size);
    }

    #[test]
    fn history_counts_dispatched_commands(text in straight_line_program(), seed in any::<u64>()) {
        // size 3 keeps '@' from targeting its own control
        let report = interpret(&text, 3, InterpreterOptions::default().with_seed(seed))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(&report.status, &RunStatus::Halted);
        prop_assert_eq!(report.history.len(), text.chars().count());
        prop_assert_eq!(report.history.is_empty(), text.is_empty());
        for (i, entry) in report.history.sequence().iter().enumerate() {
            prop_assert_eq!(entry.step, i);
            prop_assert_eq!(entry.program_counter, i);
        }
    }

    #[test]
    fn seeded_runs_are_deterministic(text in balanced_program(), seed in any::<u64>()) {
        let options = InterpreterOptions::default().with_seed(seed).with_max_steps(300);
        let a = interpret(&text, 3, options.clone()).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let b = interpret(&text, 3, options).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(a.status, b.status);
        prop_assert_eq!(a.circuit, b.circuit);
        prop_assert_eq!(a.history, b.history);
    }

    #[test]
    fn final_state_stays_normalized(text in balanced_program(), seed in any::<u64>()) {
        let options = InterpreterOptions::default().with_seed(seed).with_max_steps(300);
        let report = interpret(&text, 3, options).map_err(|e| TestCaseError::fail(e.to_string()))?;
        if let Some(state) = report.final_state {
            prop_assert!((state.norm_sqr() - 1.0).abs() < 1e-6);
        }
    }
}

#[test]
fn test_unclosed_loop_is_rejected() {
    assert_eq!(
        interpret("+[:", 1, InterpreterOptions::default()).err(),
        Some(QfError::UnbalancedLoop { bracket: '[', offset: 1 })
    );
}

#[test]
fn test_random_jump_bounce_is_cut_by_step_limit() -> Result<(), QfError> {
    // a lone '*' can only jump back onto itself
    let report = interpret("*", 1, InterpreterOptions::default().with_seed(8).with_max_steps(64))?;
    assert_eq!(report.status, RunStatus::StepLimitExceeded { limit: 64 });
    assert_eq!(report.history.len(), 64);
    assert!(report.history.sequence().iter().all(|s| s.program_counter == 0));
    Ok(())
}

#[test]
fn test_phase_gates_do_not_change_probabilities() -> Result<(), QfError> {
    let report = interpret("+:~:-:T:D:", 1, InterpreterOptions::default())?;
    for est in report.history.estimates() {
        assert!((est.p1 - 0.5).abs() < TEST_TOLERANCE, "{}", est);
    }
    Ok(())
}
