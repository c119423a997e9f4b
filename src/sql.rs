use sqlformat::{FormatOptions, Indent, QueryParams};

/// Turns raw SQL into a readable, multi-line statement.
pub trait SqlFormatter: Sync + Send {
    fn format(&self, sql: &str) -> eyre::Result<String>;
}

/// Pretty-prints SQL with `sqlformat` after a lexical sanity check.
///
/// `sqlformat` accepts any input, so blank statements, unbalanced parentheses
/// and unterminated quotes are rejected here instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettySql;

impl PrettySql {
    pub fn new() -> Self {
        Self
    }

    fn check(sql: &str) -> eyre::Result<()> {
        if sql.trim().is_empty() {
            return Err(eyre::eyre!("empty SQL statement"));
        }

        let mut depth: usize = 0;
        let mut quote: Option<char> = None;
        let mut chars = sql.chars().peekable();

        while let Some(c) = chars.next() {
            if let Some(q) = quote {
                if c == q {
                    // A doubled quote is an escaped quote inside the literal.
                    if chars.peek() == Some(&q) {
                        chars.next();
                    } else {
                        quote = None;
                    }
                }
                continue;
            }

            match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| eyre::eyre!("unexpected ')' in SQL statement"))?;
                }
                _ => {}
            }
        }

        if let Some(q) = quote {
            return Err(eyre::eyre!("unterminated {} in SQL statement", q));
        }
        if depth > 0 {
            return Err(eyre::eyre!("{} unclosed '(' in SQL statement", depth));
        }

        Ok(())
    }
}

impl SqlFormatter for PrettySql {
    fn format(&self, sql: &str) -> eyre::Result<String> {
        Self::check(sql)?;

        let options = FormatOptions {
            indent: Indent::Spaces(2),
            uppercase: true,
            ..FormatOptions::default()
        };

        Ok(sqlformat::format(sql, &QueryParams::None, options))
    }
}
