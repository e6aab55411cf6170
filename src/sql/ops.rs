//! Operator vocabularies for `Compare`, `Contains`, and `Arith` SQL IR
//! nodes, plus the surface-syntax-to-SQL-operator rewrite table.

/// A rendered comparison operator. `==`/`<>` never appear here — they are
/// rewritten to `=`/`!=` before an IR node is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_sql_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Parses a surface comparison operator, applying the rename table
    /// (`==`→`=`, `<>`→`!=`). `in`/`!in` are rejected here: they are
    /// handled exclusively by [`ContainsOp`] so that `!in` has exactly
    /// one rendering path.
    pub fn from_surface(op: &str) -> Option<CompareOp> {
        match op {
            "==" | "=" => Some(CompareOp::Eq),
            "<>" | "!=" => Some(CompareOp::Ne),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            _ => None,
        }
    }
}

/// `in` / `not in`, rendered by the dedicated `Contains` IR node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainsOp {
    In,
    NotIn,
}

impl ContainsOp {
    pub fn as_sql_str(&self) -> &'static str {
        match self {
            ContainsOp::In => "in",
            ContainsOp::NotIn => "not in",
        }
    }

    pub fn from_surface(op: &str) -> Option<ContainsOp> {
        match op {
            "in" => Some(ContainsOp::In),
            "!in" => Some(ContainsOp::NotIn),
            _ => None,
        }
    }
}

/// Scalar arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    BitAnd,
    BitOr,
}

impl ArithOp {
    pub fn as_sql_str(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::BitAnd => "&",
            ArithOp::BitOr => "|",
        }
    }

    pub fn from_surface(op: &str) -> Option<ArithOp> {
        match op {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            "&" => Some(ArithOp::BitAnd),
            "|" => Some(ArithOp::BitOr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_rewrite_never_emits_source_spellings() {
        for surface in ["==", "<>", "<", "<=", ">", ">="] {
            let op = CompareOp::from_surface(surface).unwrap();
            assert!(!["==", "<>"].contains(&op.as_sql_str()));
        }
    }

    #[test]
    fn contains_handles_in_and_not_in_only() {
        assert_eq!(ContainsOp::from_surface("in"), Some(ContainsOp::In));
        assert_eq!(ContainsOp::from_surface("!in"), Some(ContainsOp::NotIn));
        assert_eq!(CompareOp::from_surface("in"), None);
        assert_eq!(CompareOp::from_surface("!in"), None);
    }
}
