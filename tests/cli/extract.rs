use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, HEADER, plist, stderr, stdout};

#[test]
fn test_extracts_strings_from_expanded_macros() -> Result<()> {
    let test = CliTest::with_project()?;

    let mut cmd = test.extract_command();
    cmd.arg("--yes");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Found 2 source files. en.lproj/Localizable.strings does not exist and will be created.
    ✓ Updated en.lproj/Localizable.strings from 1 source file

    ----- stderr -----
    ");

    assert_eq!(
        test.read_file("en.lproj/Localizable.strings")?,
        "\"KEY\" = \"KEY\"; /* comment */\n"
    );

    // Sources are never modified and scratch space is cleaned up.
    assert!(test.read_file("Demo/Views/a.m")?.starts_with("#import \"Localization.h\""));
    assert!(test.scratch_entries()?.is_empty());

    Ok(())
}

#[test]
fn test_existing_destination_is_announced_and_overwritten() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file("en.lproj/Localizable.strings", "\"OLD\" = \"OLD\";\n")?;

    let output = test.extract_command().arg("-y").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("exists and will be overwritten"));
    assert_eq!(
        test.read_file("en.lproj/Localizable.strings")?,
        "\"KEY\" = \"KEY\"; /* comment */\n"
    );

    Ok(())
}

#[test]
fn test_multiple_sources_and_case_insensitive_pattern() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file(
        "Demo/Legacy/OLD.M",
        "NSString *old = LOC(@\"LEGACY\", @\"Old screen\");\n",
    )?;
    test.write_file("Demo/Views/notes.txt", "LOC(@\"IGNORED\", @\"not source\")\n")?;

    let output = test.extract_command().arg("--yes").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("en.lproj/Localizable.strings")?,
        "\"LEGACY\" = \"LEGACY\"; /* Old screen */\n\"KEY\" = \"KEY\"; /* comment */\n"
    );
    assert!(stdout(&output).contains("from 2 source files"));

    Ok(())
}

#[test]
fn test_missing_metadata_exits_before_touching_anything() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("Localization.h", HEADER)?;
    test.write_file("a.m", "LOC(@\"KEY\", @\"comment\");\n")?;

    let mut cmd = test.extract_command();
    cmd.arg("--yes");
    insta::with_settings!({ filters => vec![(test.root_pattern().as_str(), "[ROOT]")] }, {
        assert_cmd_snapshot!(cmd, @r#"
        success: false
        exit_code: 1
        ----- stdout -----

        ----- stderr -----
        Error: No metadata file matching "*Info.plist" found in [ROOT]
        "#);
    });

    assert!(test.scratch_entries()?.is_empty());
    assert!(!test.root().join("en.lproj").exists());

    Ok(())
}

#[test]
fn test_region_flag_skips_metadata() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("Localization.h", HEADER)?;
    test.write_file("a.m", "LOC(@\"KEY\", @\"comment\");\n")?;

    let output = test
        .extract_command()
        .args(["--region", "fr", "--yes"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("fr.lproj/Localizable.strings").exists());

    Ok(())
}

#[test]
fn test_region_read_from_named_metadata_file() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file("Config/Release.plist", &plist("de"))?;

    let output = test
        .extract_command()
        .args(["--metadata", "Config/Release.plist", "--yes"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("de.lproj/Localizable.strings").exists());
    assert!(!test.root().join("en.lproj").exists());

    Ok(())
}

#[test]
fn test_missing_header_is_config_error() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test
        .extract_command()
        .args(["--header", "Strings.h", "--yes"])
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Macro header Strings.h not found"));
    assert!(test.scratch_entries()?.is_empty());

    Ok(())
}

#[test]
fn test_basename_collision_is_hard_failure() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file("Demo/Settings/a.m", "LOC(@\"OTHER\", @\"other\");\n")?;

    let mut cmd = test.extract_command();
    cmd.arg("--yes");
    insta::with_settings!({ filters => vec![(test.root_pattern().as_str(), "[ROOT]")] }, {
        assert_cmd_snapshot!(cmd, @r"
        success: false
        exit_code: 1
        ----- stdout -----

        ----- stderr -----
        Error: [ROOT]/Demo/Settings/a.m and [ROOT]/Demo/Views/a.m share the file name a.m; rename one of them
        ");
    });

    assert!(test.scratch_entries()?.is_empty());
    assert!(!test.root().join("en.lproj").exists());

    Ok(())
}

#[test]
fn test_preprocessor_failure_exits_with_2() -> Result<()> {
    let test = CliTest::with_project()?;

    let mut cmd = test.command();
    cmd.arg("--cc")
        .arg(test.tool("fail.sh"))
        .arg("--extractor")
        .arg(test.tool("genstrings.sh"))
        .arg("--yes");
    insta::with_settings!({ filters => vec![(test.root_pattern().as_str(), "[ROOT]")] }, {
        assert_cmd_snapshot!(cmd, @r"
        success: false
        exit_code: 2
        ----- stdout -----
        Found 2 source files. en.lproj/Localizable.strings does not exist and will be created.

        ----- stderr -----
        Error: preprocessor failed on [ROOT]/Demo/Views/a.m:
        a.m: error: expected ')'
        ");
    });

    assert!(!test.root().join("en.lproj").exists());
    assert!(test.scratch_entries()?.is_empty());

    Ok(())
}

#[test]
fn test_extractor_failure_exits_with_3() -> Result<()> {
    let test = CliTest::with_project()?;

    let mut cmd = test.command();
    cmd.arg("--cc")
        .arg(test.tool("cc.sh"))
        .arg("--extractor")
        .arg(test.tool("fail.sh"))
        .arg("--yes");
    assert_cmd_snapshot!(cmd, @r"
    success: false
    exit_code: 3
    ----- stdout -----
    Found 2 source files. en.lproj/Localizable.strings does not exist and will be created.

    ----- stderr -----
    Error: string extraction failed:
    -o: error: expected ')'
    ");

    Ok(())
}

#[test]
fn test_declined_confirmation_changes_nothing() -> Result<()> {
    let test = CliTest::with_project()?;

    let mut cmd = test.extract_command();
    assert_cmd_snapshot!(cmd.pass_stdin("n\n"), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    Found 2 source files. en.lproj/Localizable.strings does not exist and will be created.

    ----- stderr -----
    Continue? [y/N] Error: aborted, nothing was changed
    ");

    assert!(!test.root().join("en.lproj").exists());
    assert!(test.scratch_entries()?.is_empty());

    Ok(())
}

#[test]
fn test_closed_stdin_counts_as_declined() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!test.root().join("en.lproj").exists());

    Ok(())
}

#[test]
fn test_confirmation_accepted() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test.run_with_stdin(test.extract_command(), "y\n")?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("en.lproj/Localizable.strings").exists());

    Ok(())
}

#[test]
fn test_keep_scratch_leaves_expanded_files() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test
        .extract_command()
        .args(["--yes", "--keep-scratch"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Scratch directory kept at"));

    let entries = test.scratch_entries()?;
    assert_eq!(entries.len(), 1);
    let scratch = &entries[0];
    let expanded = std::fs::read_to_string(scratch.join("a.m"))?;
    assert!(expanded.contains("NSLocalizedString(@\"KEY\", @\"comment\")"));
    assert!(!expanded.contains("#import"));
    assert!(!scratch.join("Localization.h").exists());

    Ok(())
}

#[test]
fn test_config_file_overrides_defaults() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("Info.plist", &plist("en"))?;
    test.write_file("Macros/L10n.h", HEADER)?;
    test.write_file("App/main.c", "const char *s = LOC(@\"KEY\", @\"comment\");\n")?;
    test.write_file("App/skip.m", "LOC(@\"SKIPPED\", @\"not matched\");\n")?;
    test.write_file(
        ".locexpandrc.json",
        &format!(
            r#"{{
                "header": "L10n.h",
                "pattern": "\\.(c|h)$",
                "cc": "{}",
                "extractor": "{}",
                "outputRoot": "Resources"
            }}"#,
            test.tool("cc.sh"),
            test.tool("genstrings.sh")
        ),
    )?;

    let output = test.command().arg("--yes").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("Resources/en.lproj/Localizable.strings")?,
        "\"KEY\" = \"KEY\"; /* comment */\n"
    );
    assert!(stdout(&output).contains("Updated Resources/en.lproj/Localizable.strings"));

    // Command-line flags win over the file.
    let output = test
        .command()
        .args(["--header", "Localization.h", "--yes"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Macro header Localization.h not found"));

    Ok(())
}

