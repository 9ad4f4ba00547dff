use std::io::{self, Write};

use crate::macros::MacroDefinition;

/// Writes one line per macro: signature, then accepted and required counts.
pub fn write_macro_list(out: &mut dyn Write, macros: &[MacroDefinition]) -> io::Result<()> {
    let mut sorted: Vec<_> = macros.iter().collect();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));
    for def in sorted {
        writeln!(
            out,
            "{}  accepts {}, requires {}",
            def.signature(),
            def.accepted_arg_count(),
            def.min_required()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{block, lit};
    use crate::macros::Parameter;

    #[test]
    fn lists_macros_alphabetically() {
        let b = MacroDefinition::new("b", vec![Parameter::required("x")], block(vec![])).unwrap();
        let a = MacroDefinition::new(
            "a",
            vec![Parameter::optional("y", lit(1))],
            block(vec![]),
        )
        .unwrap();
        let mut out = Vec::new();
        write_macro_list(&mut out, &[b, a]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "#a($y=1)  accepts 1, requires 0\n#b($x)  accepts 1, requires 1\n"
        );
    }
}
