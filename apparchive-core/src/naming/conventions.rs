use serde_json::json;

use crate::archive::paths::{dirname, SRC_FOLDER};

pub const SCREEN1_FORM_NAME: &str = "Screen1";
const PACKAGE_PREFIX: &str = "appinventor.ai_";

/// Naming rules the importer relies on but does not own: how a project's
/// main screen is namespaced, where its source lives, and what a fresh
/// project properties file looks like.
pub trait NamingConvention: Send + Sync {
    fn qualified_form_name(&self, owner_email: &str, project_name: &str) -> String;

    fn source_directory(&self, qualified_form_name: &str) -> String;

    fn project_properties(&self, project_name: &str, qualified_form_name: &str) -> String;

    fn project_settings(&self) -> String;
}

/// The layout used by YoungAndroid projects.
#[derive(Clone, Copy, Debug, Default)]
pub struct YoungAndroidConventions;

impl YoungAndroidConventions {
    fn package_name(owner_email: &str) -> String {
        let user = owner_email.split('@').next().unwrap_or_default();
        let sanitized: String = user
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", PACKAGE_PREFIX, sanitized)
    }
}

impl NamingConvention for YoungAndroidConventions {
    fn qualified_form_name(&self, owner_email: &str, project_name: &str) -> String {
        format!(
            "{}.{}.{}",
            Self::package_name(owner_email),
            project_name,
            SCREEN1_FORM_NAME
        )
    }

    fn source_directory(&self, qualified_form_name: &str) -> String {
        let form_path = format!(
            "{}/{}",
            SRC_FOLDER.trim_end_matches('/'),
            qualified_form_name.replace('.', "/")
        );
        dirname(&form_path).to_string()
    }

    fn project_properties(&self, project_name: &str, qualified_form_name: &str) -> String {
        [
            format!("main={}", qualified_form_name),
            format!("name={}", project_name),
            "assets=../assets".to_string(),
            "source=../src".to_string(),
            "build=../build".to_string(),
            "versioncode=1".to_string(),
            "versionname=1.0".to_string(),
            "useslocation=False".to_string(),
            format!("aname={}", project_name),
            "sizing=Fixed".to_string(),
            "showlistsasjson=True".to_string(),
            "theme=Classic".to_string(),
        ]
        .join("\n")
            + "\n"
    }

    fn project_settings(&self) -> String {
        json!({
            "SimpleSettings": {
                "Icon": "",
                "ShowHiddenComponents": "False",
                "PhonePreview": "Classic",
                "VersionCode": "1",
                "VersionName": "1.0",
                "UsesLocation": "False",
                "AppName": "",
                "Sizing": "Fixed",
                "ShowListsAsJson": "True",
                "Theme": "Classic",
                "DefaultFileScope": "App"
            }
        })
        .to_string()
    }
}
