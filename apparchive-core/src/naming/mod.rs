//! Naming: destination namespace for an import and rename tokens for
//! duplicated screens.

pub mod conventions;
pub mod token;

pub use conventions::{NamingConvention, YoungAndroidConventions};
pub use token::{FixedToken, NameTokenGenerator, NameTokenSource, RenameToken};

/// Destination namespace of one import call. Derived once, never mutated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamingContext {
    pub qualified_form_name: String,
    pub source_directory: String,
}

impl NamingContext {
    pub fn derive(conventions: &dyn NamingConvention, owner_email: &str, project_name: &str) -> Self {
        let qualified_form_name = conventions.qualified_form_name(owner_email, project_name);
        let source_directory = conventions.source_directory(&qualified_form_name);
        Self {
            qualified_form_name,
            source_directory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_from_owner_and_project() {
        let naming = NamingContext::derive(&YoungAndroidConventions, "bob@example.com", "Quiz");
        assert_eq!(naming.qualified_form_name, "appinventor.ai_bob.Quiz.Screen1");
        assert_eq!(naming.source_directory, "src/appinventor/ai_bob/Quiz");
    }
}
