//! Call-depth limit and call stack bookkeeping.

mod common;

#[cfg(test)]
mod tests {
    use super::common::{countdown, engine_with, no_globals, with_depth};
    use vellum::ast::builder::{block, call, lit, text};
    use vellum::macros::MacroDefinition;
    use vellum::runtime::Scope;
    use vellum::VellumError;

    #[test]
    fn recursion_within_the_limit_succeeds() {
        let engine = engine_with(with_depth(5), vec![countdown()]);
        let out = engine
            .render_to_string(&call("countdown", vec![lit(5)]), no_globals())
            .unwrap();
        assert_eq!(out, "5 4 3 2 1 ");
    }

    #[test]
    fn one_level_past_the_limit_fails_and_empties_the_stack() {
        let engine = engine_with(with_depth(3), vec![countdown()]);
        let mut scope = Scope::root();
        let mut out = Vec::new();

        let err = engine
            .render_in(&call("countdown", vec![lit(4)]), &mut scope, &mut out)
            .unwrap_err();

        match &err {
            VellumError::RecursionLimit { message } => {
                assert!(message.starts_with("Max calling depth of 3 was exceeded in macro 'countdown'"));
                assert!(message.contains("countdown->countdown->countdown"));
            }
            other => panic!("expected RecursionLimit, got {other:?}"),
        }
        assert_eq!(scope.depth(), 0);
        assert!(scope.macro_name_stack().is_empty());
        // output produced before the overflow stays written
        assert_eq!(String::from_utf8(out).unwrap(), "4 3 2 ");
    }

    #[test]
    fn recursion_limit_is_not_wrapped_by_outer_frames() {
        let engine = engine_with(with_depth(2), vec![countdown()]);
        let err = engine
            .render_to_string(&call("countdown", vec![lit(10)]), no_globals())
            .unwrap_err();
        assert!(matches!(err, VellumError::RecursionLimit { .. }));
    }

    #[test]
    fn non_positive_limit_disables_the_check() {
        for depth in [0, -1] {
            let engine = engine_with(with_depth(depth), vec![countdown()]);
            let out = engine
                .render_to_string(&call("countdown", vec![lit(40)]), no_globals())
                .unwrap();
            assert!(out.starts_with("40 39 "));
            assert!(out.ends_with("2 1 "));
        }
    }

    #[test]
    fn mutual_recursion_counts_every_frame() {
        // ping calls pong calls ping ...
        let ping = MacroDefinition::new("ping", vec![], block(vec![text("i"), call("pong", vec![])]))
            .unwrap();
        let pong = MacroDefinition::new("pong", vec![], block(vec![text("o"), call("ping", vec![])]))
            .unwrap();
        let engine = engine_with(with_depth(4), vec![ping, pong]);
        let err = engine
            .render_to_string(&call("ping", vec![]), no_globals())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("in macro 'ping'"), "{message}");
        assert!(message.contains("ping->pong->ping->pong"), "{message}");
    }

    #[test]
    fn sequential_calls_each_start_from_the_same_depth() {
        let engine = engine_with(with_depth(3), vec![countdown()]);
        let template = block(vec![
            call("countdown", vec![lit(3)]),
            text("| "),
            call("countdown", vec![lit(3)]),
        ]);
        let mut scope = Scope::root();
        let mut out = Vec::new();
        engine.render_in(&template, &mut scope, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3 2 1 | 3 2 1 ");
        assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn a_render_after_an_overflow_starts_clean() {
        let engine = engine_with(with_depth(2), vec![countdown()]);
        assert!(engine
            .render_to_string(&call("countdown", vec![lit(5)]), no_globals())
            .is_err());
        let out = engine
            .render_to_string(&call("countdown", vec![lit(2)]), no_globals())
            .unwrap();
        assert_eq!(out, "2 1 ");
    }
}
