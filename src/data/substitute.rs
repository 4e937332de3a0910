use crate::error::EditError;

/// Which rows a substitution touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only the edited row (`:s/find/replace/`).
    Row,
    /// Every row of the column (`:s/find/replace/g`).
    All,
}

/// A parsed `:s/FIND/REPLACE/FLAG` edit command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub find: String,
    pub replace: String,
    pub scope: Scope,
}

impl Substitution {
    pub const PREFIX: &'static str = ":s/";

    /// `Ok(None)` when `input` is not a substitution command at all.
    pub fn parse(input: &str) -> Result<Option<Self>, EditError> {
        let Some(body) = input.strip_prefix(Self::PREFIX) else {
            return Ok(None);
        };
        let parts: Vec<&str> = body.split('/').collect();
        let [find, replace, flag] = parts.as_slice() else {
            return Err(EditError::BadSubstitution(input.to_string()));
        };
        let scope = match *flag {
            "" => Scope::Row,
            "g" => Scope::All,
            _ => return Err(EditError::BadSubstitution(input.to_string())),
        };
        Ok(Some(Self {
            find: find.to_string(),
            replace: replace.to_string(),
            scope,
        }))
    }

    /// Plain textual replacement of every occurrence.
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.find, &self.replace)
    }

    /// Substitute in the display form of `value` and re-read it as a number.
    pub fn apply_numeric(&self, value: f64) -> Option<f64> {
        self.apply(&value.to_string()).trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let s = Substitution::parse(":s/5/9/g").unwrap().unwrap();
        assert_eq!(s.find, "5");
        assert_eq!(s.replace, "9");
        assert_eq!(s.scope, Scope::All);

        let s = Substitution::parse(":s/ns/ps/").unwrap().unwrap();
        assert_eq!(s.scope, Scope::Row);
    }

    #[test]
    fn not_a_command() {
        assert_eq!(Substitution::parse("12.5"), Ok(None));
        assert_eq!(Substitution::parse("s/a/b/"), Ok(None));
    }

    #[test]
    fn malformed_commands() {
        assert!(Substitution::parse(":s/a/b").is_err());
        assert!(Substitution::parse(":s/a/b/x").is_err());
        assert!(Substitution::parse(":s/a/b/g/").is_err());
    }

    #[test]
    fn numeric_substitution() {
        let s = Substitution::parse(":s/5/9/g").unwrap().unwrap();
        assert_eq!(s.apply_numeric(15.0), Some(19.0));
        assert_eq!(s.apply_numeric(0.5), Some(0.9));
        let s = Substitution::parse(":s/5/x/").unwrap().unwrap();
        assert_eq!(s.apply_numeric(5.0), None);
    }
}
