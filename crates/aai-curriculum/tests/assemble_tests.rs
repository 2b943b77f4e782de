use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use aai_curriculum::{
    assemble, assemble_in_parts, discover, stratify, write_manifest, ARENA_HEADER,
};

fn write_task(dir: &Path, name: &str, key: &str) {
    let body = format!(
        "!ArenaConfig\narenas:\n  {key}: !Arena\n    pass_mark: 0\n    t: 250\n    items:\n    - !Item\n      name: GoodGoal\n"
    );
    fs::write(dir.join(name), body).unwrap();
}

fn arena_keys(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.ends_with(": !Arena"))
        .map(|line| line.trim().trim_end_matches(": !Arena").to_owned())
        .collect()
}

#[test]
fn merged_arenas_are_numbered_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let tasks = tmp.path().join("tasks");
    fs::create_dir_all(tasks.join("nested")).unwrap();
    write_task(&tasks, "tutorial_1.yml", "0");
    write_task(&tasks, "tutorial_2.yml", "-1");
    write_task(&tasks.join("nested"), "OP-STC-Allo-PCTB-3Cup-1.yaml", "0");
    fs::write(tasks.join("README.md"), "not a task").unwrap();

    let files = discover(&tasks).unwrap();
    assert_eq!(files.len(), 3);

    let out = tmp.path().join("curriculum.yml");
    assert_eq!(assemble(&files, &out), Some(out.clone()));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with(ARENA_HEADER));
    assert_eq!(text.matches("!ArenaConfig").count(), 1);
    assert_eq!(arena_keys(&text), vec!["0", "1", "2"]);
    assert!(text.contains("# OP-STC-Allo-PCTB-3Cup-1.yaml\n  0: !Arena\n"));
    // only the key line is rewritten
    assert_eq!(text.matches("pass_mark: 0").count(), 3);
}

#[test]
fn parts_are_numbered_and_cover_every_file() {
    let tmp = tempfile::tempdir().unwrap();
    for i in 0..7 {
        write_task(tmp.path(), &format!("OP-Controls-Basic-{i}.yml"), "0");
    }
    let files = discover(tmp.path()).unwrap();
    let out_dir = tmp.path().join("out");
    let mut rng = StdRng::seed_from_u64(1234);

    let parts = assemble_in_parts(&files, &out_dir.join("merged.yml"), 3, true, &mut rng).unwrap();
    assert_eq!(
        parts,
        vec![
            Some(out_dir.join("merged_part1.yml")),
            Some(out_dir.join("merged_part2.yml")),
            Some(out_dir.join("merged_part3.yml")),
        ]
    );

    let mut total = 0;
    for part in parts.iter().flatten() {
        let keys = arena_keys(&fs::read_to_string(part).unwrap());
        let expected: Vec<String> = (0..keys.len()).map(|i| i.to_string()).collect();
        assert_eq!(keys, expected);
        total += keys.len();
    }
    assert_eq!(total, 7);
}

#[test]
fn stratified_manifest_flags_selection() {
    let tmp = tempfile::tempdir().unwrap();
    let tasks = tmp.path().join("tasks");
    fs::create_dir(&tasks).unwrap();
    for i in 0..6 {
        write_task(&tasks, &format!("OP-Controls-Basic-{i}.yml"), "0");
    }
    for i in 0..4 {
        write_task(&tasks, &format!("OP-RP-Allo-PCTB-4CupGrid-{i}.yml"), "0");
    }

    let all = discover(&tasks).unwrap();
    let mut rng = StdRng::seed_from_u64(1234);
    let selected = stratify(&all, 5, &mut rng);
    assert_eq!(selected.len(), 5);

    let manifest = tmp.path().join("overview.csv");
    write_manifest(&manifest, &all, &selected).unwrap();
    let text = fs::read_to_string(&manifest).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows[0], ",taskName,inCurriculum");
    assert_eq!(rows.len(), 11);
    assert_eq!(rows.iter().filter(|r| r.ends_with(",1")).count(), 5);
}
