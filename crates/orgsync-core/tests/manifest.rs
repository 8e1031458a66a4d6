use orgsync_core::manifest::{parse_manifest, read_manifest};
use orgsync_core::ResourceRecord;

#[test]
fn empty_content_returns_no_records() {
    assert!(parse_manifest("").is_empty());
}

#[test]
fn single_repository_with_description() {
    let content = "
## Current Repositories

## my-repo
- Description: A test repository
";
    assert_eq!(
        parse_manifest(content),
        vec![ResourceRecord::new("my-repo", "A test repository")]
    );
}

#[test]
fn description_topics_and_origin() {
    let content = "
## Current Repositories

## core
- Description: Democratic governance system
- Topics: democracy, open-source, governance
- Origin: someone/core
";
    let records = parse_manifest(content);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "core");
    assert_eq!(
        records[0].topics,
        vec!["democracy", "open-source", "governance"]
    );
    assert_eq!(records[0].origin.as_deref(), Some("someone/core"));
}

#[test]
fn topics_are_trimmed_and_blank_entries_dropped() {
    let content = "
## my-repo
- Description: Test repository
- Topics:  topic1 ,  topic2  , , topic3
";
    let records = parse_manifest(content);
    assert_eq!(records[0].topics, vec!["topic1", "topic2", "topic3"]);
}

#[test]
fn repository_without_topics_has_empty_topics() {
    let records = parse_manifest("## my-repo\n- Description: No topics here\n");
    assert!(records[0].topics.is_empty());
    assert!(records[0].origin.is_none());
}

#[test]
fn keys_are_case_insensitive() {
    let records = parse_manifest("## my-repo\n- DESCRIPTION: Loud\n- topics: a, b\n");
    assert_eq!(records[0].description, "Loud");
    assert_eq!(records[0].topics, vec!["a", "b"]);
}

#[test]
fn fenced_code_blocks_are_ignored() {
    let content = "
## Documentation

Here's an example:

```markdown
## inside-fence
- Description: This is inside a code block
- Topics: example, test
```

---

## Current Repositories

## actual-repo
- Description: This is the only real repository
- Topics: real, test
";
    let records = parse_manifest(content);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "actual-repo");
    assert_eq!(records[0].topics, vec!["real", "test"]);
}

#[test]
fn reserved_headings_are_skipped() {
    let content = "
## Example
- Description: skipped

## Format
- Description: skipped too

## Current Repositories
- Description: also skipped

## real-repo
- Description: This is real
";
    let records = parse_manifest(content);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "real-repo");
}

#[test]
fn records_without_description_are_dropped() {
    let content = "
## valid-repo
- Description: Valid repository

## invalid-repo
- Topics: topic1, topic2

## another-valid
- Description: Another valid one
";
    let names: Vec<_> = parse_manifest(content).into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["valid-repo", "another-valid"]);
}

#[test]
fn duplicate_names_keep_first_definition() {
    let content = "
## twin
- Description: first

## twin
- Description: second
";
    let records = parse_manifest(content);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, "first");
}

#[test]
fn template_document_has_no_repositories() {
    let content = "# Organization Repositories

## Format

```markdown
## repository-name
- Description: Brief description of the repository
```

## Example

```markdown
## some-core
- Description: Something
```

---

## Current Repositories

<!-- Add repositories below this line -->
";
    assert!(parse_manifest(content).is_empty());
}

#[test]
fn read_manifest_reports_missing_file() {
    let err = read_manifest(std::path::Path::new("/definitely/not/here/REPOSITORIES.md"))
        .unwrap_err();
    assert!(err.to_string().contains("failed to read manifest"));
}
