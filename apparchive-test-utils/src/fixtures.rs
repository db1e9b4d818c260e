use anyhow::Result;

use crate::archive::ArchiveBuilder;

/// Properties of the project the sample archives were exported from.
pub const SAMPLE_MANIFEST: &str = "main=appinventor.ai_alice.HelloPurr.Screen1\nname=HelloPurr\n";

/// A small exported project: two source files for `Screen1`, an asset, the
/// remix history and a keystore.
pub fn sample_project_archive() -> Result<Vec<u8>> {
    sample_project().build()
}

/// The same project as [`sample_project_archive`], deflated and written with
/// trailing data descriptors the way exporters writing to a plain output
/// stream lay it out.
pub fn sample_streamed_project_archive() -> Result<Vec<u8>> {
    sample_project().deflated().build_streamed()
}

fn sample_project() -> ArchiveBuilder {
    ArchiveBuilder::new()
        .directory("youngandroidproject/")
        .manifest(SAMPLE_MANIFEST)
        .file("youngandroidproject/remix_history", "<history/>")
        .directory("src/appinventor/ai_alice/HelloPurr/")
        .file(
            "src/appinventor/ai_alice/HelloPurr/Screen1.scm",
            "#|\n$JSON\n{\"Properties\":{\"$Name\":\"Screen1\",\"Title\":\"Screen1\"}}\n|#",
        )
        .file(
            "src/appinventor/ai_alice/HelloPurr/Screen1.bky",
            "<xml><block type=\"component_event\" instance_name=\"Screen1\"/></xml>",
        )
        .file("assets/kitty.png", b"\x89PNG\x00\x01\x02\x03")
        .file("android.keystore", b"\xfe\xed\xfe\xed")
}

/// A screen export: the three generated files for `Screen1` plus an asset
/// that a screen import leaves behind.
pub fn sample_screen_archive() -> Result<Vec<u8>> {
    ArchiveBuilder::new()
        .file(
            "src/appinventor/ai_alice/HelloPurr/Screen1.scm",
            "{\"$Name\":\"Screen1\",\"Title\":\"Screen1\"}",
        )
        .file(
            "src/appinventor/ai_alice/HelloPurr/Screen1.bky",
            "<block instance_name=\"Screen1\"/>",
        )
        .file(
            "src/appinventor/ai_alice/HelloPurr/Screen1.yail",
            "(define-form appinventor.ai_alice.HelloPurr.Screen1 Screen1)",
        )
        .file("assets/kitty.png", b"\x01\x02\x03")
        .build()
}
