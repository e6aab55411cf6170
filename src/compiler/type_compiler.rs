//! The type compiler: AST type → DDL fragment.

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{PqlError, Result};
use crate::sql::Sql;
use crate::state::State;
use crate::types::{Primitive, TableType, Type};

/// `compile_type(state, T) -> text`. Exhaustive match over the type
/// lattice.
pub fn compile_type(state: &State, ty: &Type, nullable: bool) -> Result<String> {
    let text = match ty {
        Type::Primitive(p) => compile_primitive(*p, nullable),
        Type::Optional(inner) => compile_type(state, inner, true)?,
        Type::Id => {
            let mut s = if state.db.is_postgres() {
                "SERIAL".to_string()
            } else {
                "INTEGER".to_string()
            };
            if !nullable {
                s.push_str(" NOT NULL");
            }
            s
        }
        // Foreign key is integer to the target's `id` (TODO: any column,
        // once projection-based FK targets are supported).
        Type::RelationalColumn(_) => "INTEGER".to_string(),
        Type::DatumColumn(inner) => compile_type(state, inner, nullable)?,
        other => {
            return Err(PqlError::compile_error(
                None,
                format!("type '{other:?}' has no DDL representation"),
            ))
        }
    };
    Ok(text)
}

fn compile_primitive(p: Primitive, nullable: bool) -> String {
    let base = match p {
        Primitive::Int => "INTEGER",
        Primitive::String => "VARCHAR(4000)",
        Primitive::Float => "FLOAT",
        Primitive::Bool => "BOOLEAN",
        Primitive::Text => "TEXT",
        Primitive::DateTime => "TIMESTAMP",
    };
    if nullable {
        base.to_string()
    } else {
        format!("{base} NOT NULL")
    }
}

/// `compile_type_def(state, table) -> RawSql`. Flattens columns via dotted
/// paths and emits a `CREATE [TEMPORARY] TABLE` statement.
pub fn compile_type_def(state: &State, table: &TableType) -> Result<Sql> {
    debug!(table = %table.name, "compile_type_def");
    table.validate(None)?;

    let mut columns = Vec::new();
    let mut posts = Vec::new();

    for flat in table.flatten_type() {
        let ty_sql = compile_type(state, &flat.ty, false)?;
        columns.push(format!("{} {}", flat.dotted_name, ty_sql));

        if let Type::RelationalColumn(target) = &flat.ty {
            // Many engines disallow FK constraints on temporary tables.
            if !table.temporary {
                posts.push(format!(
                    "FOREIGN KEY({}) REFERENCES {}(id)",
                    flat.dotted_name, target.name
                ));
            }
        }
    }

    if !table.primary_keys.is_empty() {
        let names: Vec<String> = table
            .primary_keys
            .iter()
            .map(|path| path.join("_"))
            .collect();
        posts.push(format!("PRIMARY KEY ({})", names.join(", ")));
    }

    let command = if table.temporary {
        "CREATE TEMPORARY TABLE"
    } else {
        "CREATE TABLE IF NOT EXISTS"
    };

    let mut clauses = columns;
    clauses.extend(posts);
    let text = format!("{command} {} ({})", table.name, clauses.join(", "));

    Ok(Sql::RawSql {
        ty: Type::Null,
        text,
    })
}

/// Not referenced directly in `compile_type_def`, which reads
/// `state.db.is_postgres()` instead; kept as a standalone dialect check
/// for callers that only have a bare `Dialect`.
pub fn is_postgres(dialect: Dialect) -> bool {
    matches!(dialect, Dialect::Postgres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::dialect::DbTarget;
    use crate::instance::Instance;
    use crate::state::AccessLevel;
    use crate::stdlib::{PqlFunction, Stdlib};
    use crate::types::FieldMap;

    struct NoStdlib;
    impl Stdlib for NoStdlib {
        fn lookup(&self, _name: &str) -> Option<&dyn PqlFunction> {
            None
        }
    }

    fn state(dialect: Dialect) -> State<'static> {
        State::new(
            DbTarget::new(dialect),
            AccessLevel::Compile,
            CompilerConfig::default(),
            &NoStdlib,
        )
    }

    fn users_table() -> TableType {
        let cols = FieldMap::from([
            ("id".to_string(), Type::Id),
            ("name".to_string(), Type::Primitive(Primitive::String)),
        ]);
        TableType {
            name: "users".to_string(),
            columns: cols,
            temporary: false,
            primary_keys: vec![vec!["id".to_string()]],
        }
    }

    #[test]
    fn sqlite_ddl_matches_scenario_1() {
        let s = state(Dialect::Sqlite);
        let ddl = compile_type_def(&s, &users_table()).unwrap();
        let Sql::RawSql { text, .. } = ddl else {
            panic!("expected RawSql")
        };
        assert_eq!(
            text,
            "CREATE TABLE IF NOT EXISTS users (id INTEGER NOT NULL, name VARCHAR(4000) NOT NULL, PRIMARY KEY (id))"
        );
        let _ = Instance::null(); // silence unused import in some feature configs
    }

    #[test]
    fn postgres_uses_serial_for_id() {
        let s = state(Dialect::Postgres);
        let ddl = compile_type_def(&s, &users_table()).unwrap();
        let Sql::RawSql { text, .. } = ddl else {
            panic!("expected RawSql")
        };
        assert!(text.contains("id SERIAL NOT NULL"));
    }

    #[test]
    fn temporary_table_skips_foreign_keys() {
        let s = state(Dialect::Sqlite);
        let target = std::rc::Rc::new(users_table());
        let mut cols = FieldMap::new();
        cols.insert("id".to_string(), Type::Id);
        cols.insert("owner".to_string(), Type::RelationalColumn(target));
        let temp = TableType {
            name: "tmp".to_string(),
            columns: cols,
            temporary: true,
            primary_keys: vec![],
        };
        let ddl = compile_type_def(&s, &temp).unwrap();
        let Sql::RawSql { text, .. } = ddl else {
            panic!("expected RawSql")
        };
        assert!(text.starts_with("CREATE TEMPORARY TABLE"));
        assert!(!text.contains("FOREIGN KEY"));
    }
}
