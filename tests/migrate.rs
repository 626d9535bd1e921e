//! End-to-end tests for slides-migrate: real files in a temp directory,
//! driven through the public file-level API.
//!
//! Run with:
//!   cargo test --test migrate -- --nocapture

use serde_json::{json, Value};
use slides_migrate::{
    convert_file, flatten_with, join_chapters, join_file, partition, split_file, ConvertConfig,
    ConvertOutcome, FixedIdBase, ItemIssue, JoinConfig, JoinSource, MigrateError, SlideRecord,
    SplitConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

const BASE: &str = "20250101-120000-";

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, serde_json::to_string_pretty(value).unwrap()).unwrap();
    p
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn fixed_config() -> ConvertConfig {
    ConvertConfig::builder()
        .id_base(Arc::new(FixedIdBase::new(BASE)))
        .build()
        .unwrap()
}

fn backups_in(dir: &Path, name: &str) -> Vec<PathBuf> {
    let prefix = format!("{name}.bak.");
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
        })
        .collect()
}

/// A deck shaped like the real site content: mixed list and keyed chapters,
/// a stray string, single-image strings and a pre-set id.
fn sample_deck() -> Value {
    json!({
        "01": [
            {"title": "Bienvenida", "date": "2024-01-10", "body": "Hola", "images": "img/01.jpg"},
            {"title": "Segunda", "images": ["img/02a.jpg", "img/02b.jpg"]}
        ],
        "02": {
            "10": {"title": "Diez"},
            "2": {"title": "Dos", "id": "fixed-id"},
            "1": {"title": "Uno", "images": null}
        },
        "03": [
            "not a slide",
            {"title": "Tercero", "chapter": ""}
        ]
    })
}

/// Every record has a non-empty id and chapter and a list of images.
fn assert_normalized(slides: &[Value]) {
    for (i, s) in slides.iter().enumerate() {
        let id = s["id"].as_str().unwrap_or("");
        assert!(!id.is_empty(), "slide {i} has no id: {s}");
        let chapter = s["chapter"].as_str().unwrap_or("");
        assert!(!chapter.is_empty(), "slide {i} has no chapter: {s}");
        assert!(s["images"].is_array(), "slide {i} images not a list: {s}");
    }
}

// ── convert ──────────────────────────────────────────────────────────────────

#[test]
fn convert_writes_flat_array_and_backup() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "slides.json", &sample_deck());
    let original = std::fs::read_to_string(&input).unwrap();

    let ConvertOutcome::Converted(stats) = convert_file(&input, &fixed_config()).unwrap() else {
        panic!("expected a conversion");
    };

    assert_eq!(stats.output_path, dir.path().join("slides_converted.json"));
    assert_eq!(stats.chapters, 3);
    assert_eq!(stats.slides, 6);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.id_base, BASE);

    // Backup holds the untouched original; input is unchanged.
    let backup = stats.backup_path.expect("backup path");
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), original);
    assert_eq!(std::fs::read_to_string(&input).unwrap(), original);
    assert_eq!(backups_in(dir.path(), "slides.json"), vec![backup]);

    let out = read_json(&stats.output_path);
    let slides = out.as_array().unwrap();
    assert_normalized(slides);

    let titles: Vec<&str> = slides.iter().map(|s| s["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Bienvenida", "Segunda", "Uno", "Dos", "Diez", "Tercero"]);

    let ids: Vec<&str> = slides.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        [
            "20250101-120000-01-1",
            "20250101-120000-01-2",
            "20250101-120000-02-1",
            "fixed-id",
            "20250101-120000-02-3",
            "20250101-120000-03-2",
        ]
    );

    assert_eq!(slides[0]["images"], json!(["img/01.jpg"]));
    assert_eq!(slides[1]["images"], json!(["img/02a.jpg", "img/02b.jpg"]));
    assert_eq!(slides[2]["images"], json!([]));
    assert_eq!(slides[5]["chapter"], "03");
}

#[test]
fn convert_keeps_field_order_and_unknown_fields() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "slides.json",
        &json!({"01": [{"title": "A", "date": "d", "body": "b", "extra": {"k": [1, 2]}}]}),
    );
    convert_file(&input, &fixed_config()).unwrap();

    let text = std::fs::read_to_string(dir.path().join("slides_converted.json")).unwrap();
    let order: Vec<usize> = ["\"title\"", "\"date\"", "\"body\"", "\"extra\"", "\"chapter\"", "\"id\"", "\"images\""]
        .iter()
        .map(|k| text.find(k).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "field order changed:\n{text}");
    assert!(text.ends_with("]\n"));
}

#[test]
fn convert_reports_item_issues() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "slides.json",
        &json!({"01": ["x", {"title": "ok"}], "02": {"b": {"t": 1}, "a": {"t": 2}}}),
    );
    let ConvertOutcome::Converted(stats) = convert_file(&input, &fixed_config()).unwrap() else {
        panic!("expected a conversion");
    };
    assert_eq!(
        stats.issues,
        vec![
            ItemIssue::InvalidItemShape {
                chapter: "01".into(),
                position: 1,
                found: "a string".into(),
            },
            ItemIssue::AmbiguousKeyOrdering {
                chapter: "02".into(),
                keys: vec!["a".into(), "b".into()],
            },
        ]
    );
}

#[test]
fn convert_in_place_overwrites_input() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "slides.json", &json!({"01": [{"title": "A"}]}));

    let config = ConvertConfig::builder()
        .in_place(true)
        .id_base(Arc::new(FixedIdBase::new(BASE)))
        .build()
        .unwrap();
    let ConvertOutcome::Converted(stats) = convert_file(&input, &config).unwrap() else {
        panic!("expected a conversion");
    };

    assert_eq!(stats.output_path, input);
    assert!(!dir.path().join("slides_converted.json").exists());
    assert_eq!(
        read_json(&input),
        json!([{"title": "A", "chapter": "01", "id": "20250101-120000-01-1", "images": []}])
    );
    let backup = stats.backup_path.unwrap();
    assert_eq!(read_json(&backup), json!({"01": [{"title": "A"}]}));
}

#[cfg(unix)]
#[test]
fn convert_in_place_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "slides.json", &sample_deck());
    std::fs::set_permissions(&input, std::fs::Permissions::from_mode(0o644)).unwrap();

    let config = ConvertConfig::builder()
        .in_place(true)
        .id_base(Arc::new(FixedIdBase::new(BASE)))
        .build()
        .unwrap();
    convert_file(&input, &config).unwrap();

    let mode = std::fs::metadata(&input).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[test]
fn convert_without_backup() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "slides.json", &json!({"01": []}));
    let config = ConvertConfig::builder().backup(false).build().unwrap();

    let ConvertOutcome::Converted(stats) = convert_file(&input, &config).unwrap() else {
        panic!("expected a conversion");
    };
    assert!(stats.backup_path.is_none());
    assert!(backups_in(dir.path(), "slides.json").is_empty());
    assert_eq!(read_json(&stats.output_path), json!([]));
}

#[test]
fn convert_already_flat_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "slides.json", &json!([{"id": "a"}, {"id": "b"}]));

    match convert_file(&input, &fixed_config()).unwrap() {
        ConvertOutcome::AlreadyFlat { path, slides } => {
            assert_eq!(path, input);
            assert_eq!(slides, 2);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!dir.path().join("slides_converted.json").exists());
    assert!(backups_in(dir.path(), "slides.json").is_empty());
}

#[test]
fn convert_rejects_scalar_document() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "slides.json", &json!("just text"));
    let err = convert_file(&input, &fixed_config()).unwrap_err();
    assert!(matches!(err, MigrateError::UnexpectedShape { .. }), "got: {err}");
    assert!(backups_in(dir.path(), "slides.json").is_empty());
}

#[test]
fn convert_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = convert_file(dir.path().join("slides.json"), &fixed_config()).unwrap_err();
    assert!(matches!(err, MigrateError::FileNotFound { .. }));
}

// ── split ────────────────────────────────────────────────────────────────────

#[test]
fn split_writes_one_file_per_chapter_in_first_seen_order() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "slides.json",
        &json!([
            {"chapter": "02", "id": "x"},
            {"chapter": "01", "id": "y"},
            {"chapter": "02", "id": "z"},
            {"id": "no-chapter"},
            42
        ]),
    );

    let stats = split_file(&input, &SplitConfig::default()).unwrap();

    let chapters: Vec<&str> = stats.files.iter().map(|f| f.chapter.as_str()).collect();
    assert_eq!(chapters, ["02", "01"]);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.total_slides(), 4);
    assert!(stats.manifest_path.is_none());

    assert_eq!(
        read_json(&dir.path().join("slides-02.json")),
        json!([{"chapter": "02", "id": "x"}, {"chapter": "02", "id": "z"}])
    );
    assert_eq!(
        read_json(&dir.path().join("slides-01.json")),
        json!([{"chapter": "01", "id": "y"}, {"id": "no-chapter"}])
    );
}

#[test]
fn split_writes_manifest_and_keeps_titles() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "slides.json",
        &json!([{"chapter": "01", "id": "a"}, {"chapter": "02", "id": "b"}]),
    );
    write_json(
        dir.path(),
        "chapters.json",
        &json!([{"id": "02", "title": "Segundo"}, {"id": "05", "title": "Viejo"}]),
    );

    let out = dir.path().join("out");
    let config = SplitConfig::builder()
        .output_dir(&out)
        .write_manifest(true)
        .build()
        .unwrap();
    let stats = split_file(&input, &config).unwrap();

    // Manifest lives with the chapter files; the old one in the input dir is
    // not the one being replaced.
    assert_eq!(stats.manifest_path, Some(out.join("chapters.json")));
    assert_eq!(read_json(&out.join("chapters.json")), json!([{"id": "01"}, {"id": "02"}]));
    assert!(out.join("slides-01.json").exists());
    assert!(out.join("slides-02.json").exists());

    // Re-split into the input dir: existing titles survive.
    let config = SplitConfig::builder().write_manifest(true).build().unwrap();
    let stats = split_file(&input, &config).unwrap();
    assert_eq!(
        read_json(&dir.path().join("chapters.json")),
        json!([{"id": "01"}, {"id": "02", "title": "Segundo"}])
    );
    // Only the manifest existed in the input dir, so only it was backed up.
    assert_eq!(stats.backups, backups_in(dir.path(), "chapters.json"));
    assert_eq!(stats.backups.len(), 1);
}

#[test]
fn split_backs_up_overwritten_chapter_files() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "slides.json", &json!([{"chapter": "01", "id": "new"}]));
    write_json(dir.path(), "slides-01.json", &json!([{"id": "old"}]));

    let stats = split_file(&input, &SplitConfig::default()).unwrap();
    assert_eq!(stats.backups.len(), 1);
    assert_eq!(read_json(&stats.backups[0]), json!([{"id": "old"}]));
    assert_eq!(read_json(&dir.path().join("slides-01.json")), json!([{"chapter": "01", "id": "new"}]));
}

#[test]
fn split_refuses_chapters_sharing_a_file_name() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "slides.json",
        &json!([{"chapter": "a/b", "id": "x"}, {"chapter": "a_b", "id": "y"}]),
    );

    let err = split_file(&input, &SplitConfig::default()).unwrap_err();
    match err {
        MigrateError::ChapterFileCollision { path, first, second } => {
            assert_eq!(path, dir.path().join("slides-a_b.json"));
            assert_eq!((first.as_str(), second.as_str()), ("a/b", "a_b"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // Nothing was written, so no record was lost.
    assert!(!dir.path().join("slides-a_b.json").exists());
}

#[test]
fn split_refuses_chapter_file_over_manifest() {
    let dir = TempDir::new().unwrap();
    // Prefix "c" + chapter "hapters" lands on the manifest's own name.
    let input = write_json(dir.path(), "slides.json", &json!([{"chapter": "hapters", "id": "x"}]));
    let config = SplitConfig::builder()
        .file_prefix("c")
        .write_manifest(true)
        .build()
        .unwrap();

    let err = split_file(&input, &config).unwrap_err();
    assert!(matches!(err, MigrateError::ChapterFileCollision { .. }), "got: {err}");
    assert!(!dir.path().join("chapters.json").exists());
}

#[test]
fn split_rejects_chapter_object() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "slides.json", &sample_deck());
    let err = split_file(&input, &SplitConfig::default()).unwrap_err();
    assert!(matches!(err, MigrateError::NotFlat { .. }), "got: {err}");
}

// ── join ─────────────────────────────────────────────────────────────────────

#[test]
fn join_follows_manifest_order_and_skips_missing() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "chapters.json", &json!([{"id": "02"}, {"id": 1}, {"id": "03"}, {"id": "04"}]));
    write_json(dir.path(), "slides-02.json", &json!([{"id": "b1"}, {"id": "b2"}]));
    write_json(dir.path(), "slides-1.json", &json!([{"id": "a1"}]));
    write_json(dir.path(), "slides-04.json", &json!({"not": "an array"}));

    let config = JoinConfig::builder().dir(dir.path()).build().unwrap();
    let joined = join_chapters(&config);

    assert_eq!(joined.source, JoinSource::Manifest);
    let ids: Vec<&str> = joined.slides.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["b1", "b2", "a1"]);
    assert_eq!(joined.missing, ["03", "04"]);
    assert_eq!(joined.loaded.len(), 2);
}

#[test]
fn join_falls_back_to_single_deck() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "chapters.json", &json!([]));
    write_json(dir.path(), "slides.json", &json!([{"id": "only"}]));

    let config = JoinConfig::builder().dir(dir.path()).build().unwrap();
    let joined = join_chapters(&config);
    assert_eq!(joined.source, JoinSource::Fallback);
    assert_eq!(joined.slides, vec![json!({"id": "only"})]);
}

#[test]
fn join_with_nothing_is_empty() {
    let dir = TempDir::new().unwrap();
    let config = JoinConfig::builder().dir(dir.path()).build().unwrap();
    let joined = join_chapters(&config);
    assert_eq!(joined.source, JoinSource::Empty);
    assert!(joined.slides.is_empty());
}

#[test]
fn join_file_writes_and_backs_up() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "chapters.json", &json!([{"id": "01"}]));
    write_json(dir.path(), "slides-01.json", &json!([{"id": "a"}]));
    let output = write_json(dir.path(), "merged.json", &json!(["previous"]));

    let config = JoinConfig::builder().dir(dir.path()).build().unwrap();
    let stats = join_file(&config, &output).unwrap();

    assert_eq!(stats.slides, 1);
    assert_eq!(read_json(&output), json!([{"id": "a"}]));
    assert_eq!(read_json(&stats.backup_path.unwrap()), json!(["previous"]));
}

// ── Round trips ──────────────────────────────────────────────────────────────

#[test]
fn partition_then_flatten_reproduces_flattened_output() {
    let deck = sample_deck();
    let flat = flatten_with(deck.as_object().unwrap(), &FixedIdBase::new(BASE));

    let regrouped = partition(&flat);
    let again = flatten_with(&regrouped.to_map(), &FixedIdBase::new("other-base-"));

    assert_eq!(again, flat);
}

#[test]
fn convert_split_join_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "slides.json", &sample_deck());

    let config = ConvertConfig::builder()
        .in_place(true)
        .id_base(Arc::new(FixedIdBase::new(BASE)))
        .build()
        .unwrap();
    convert_file(&input, &config).unwrap();
    let converted = read_json(&input);

    let split = SplitConfig::builder().write_manifest(true).build().unwrap();
    split_file(&input, &split).unwrap();

    let join = JoinConfig::builder().dir(dir.path()).build().unwrap();
    let joined = join_chapters(&join);
    assert_eq!(Value::Array(joined.slides), converted);
}

#[test]
fn flattened_length_is_items_minus_invalid() {
    let deck = json!({
        "a": [{}, {}, 1, {}],
        "b": {"1": {}, "2": "x"},
        "c": [],
        "d": null
    });
    let flat = flatten_with(deck.as_object().unwrap(), &FixedIdBase::new(BASE));
    assert_eq!(flat.len(), 4);

    let values: Vec<Value> = flat.into_iter().map(SlideRecord::into_value).collect();
    assert_normalized(&values);
}
