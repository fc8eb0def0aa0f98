use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fintrack(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fintrack").unwrap();
    cmd.env("FINTRACK_DATA_DIR", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    fintrack(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));
    dir
}

#[test]
fn init_seeds_categories_once() {
    let dir = initialized();
    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("finance.json").exists());

    fintrack(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));

    fintrack(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries").and(predicate::str::contains("Dining")));
}

#[test]
fn category_create_rejects_duplicate_names() {
    let dir = initialized();

    fintrack(&dir)
        .args(["category", "create", "Rent", "--color", "#112233"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created category: Rent #112233"));

    fintrack(&dir)
        .args(["category", "create", "rent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn month_end_income_projects_without_drift() {
    let dir = initialized();

    fintrack(&dir)
        .args([
            "entry", "add", "Salary", "100", "--income", "--every", "monthly", "--date",
            "2024-01-31",
        ])
        .assert()
        .success();

    fintrack(&dir)
        .args([
            "entry",
            "occurrences",
            "Salary",
            "--from",
            "2024-01-01",
            "--to",
            "2024-04-30",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("2024-01-31")
                .and(predicate::str::contains("2024-02-29"))
                .and(predicate::str::contains("2024-03-31"))
                .and(predicate::str::contains("2024-04-30"))
                .and(predicate::str::contains("4 total"))
                .and(predicate::str::contains("400.00")),
        );

    fintrack(&dir)
        .args(["summary", "--from", "2024-01-01", "--to", "2024-04-30", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"incomeTotal\": 40000"));
}

#[test]
fn inverted_window_is_an_error() {
    let dir = initialized();

    fintrack(&dir)
        .args(["summary", "--from", "2024-05-01", "--to", "2024-04-30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date range"));
}

#[test]
fn expense_requires_category() {
    let dir = initialized();

    fintrack(&dir)
        .args(["entry", "add", "Mystery", "10", "--date", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expenses must have a category"));
}

#[test]
fn budget_status_reports_overspending_and_alerts() {
    let dir = initialized();

    fintrack(&dir)
        .args(["budget", "set", "Dining", "300"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget for Dining: 300.00 (Monthly)"));
    fintrack(&dir)
        .args(["budget", "alert", "Dining", "80"])
        .assert()
        .success();
    fintrack(&dir)
        .args(["entry", "add", "Dinner", "330", "-c", "Dining", "--date", "2024-03-10"])
        .assert()
        .success();

    fintrack(&dir)
        .args(["budget", "status", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("OVER")
                .and(predicate::str::contains("110%"))
                .and(predicate::str::contains("Dining reached 80%")),
        );
}

#[test]
fn deleting_category_in_use_fails() {
    let dir = initialized();

    fintrack(&dir)
        .args(["entry", "add", "Weekly shop", "60", "-c", "Groceries", "--every", "weekly"])
        .assert()
        .success();

    fintrack(&dir)
        .args(["category", "delete", "Groceries"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still used by 1 record(s)"));

    fintrack(&dir)
        .args(["entry", "delete", "Weekly shop"])
        .assert()
        .success();
    fintrack(&dir)
        .args(["category", "delete", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted category: Groceries"));
}

#[test]
fn goal_progress_tracks_contributions() {
    let dir = initialized();

    fintrack(&dir)
        .args(["goal", "create", "Holiday", "2000", "--deadline", "2024-07-01"])
        .assert()
        .success();
    fintrack(&dir)
        .args(["goal", "milestone", "Holiday", "Flights", "600"])
        .assert()
        .success();
    fintrack(&dir)
        .args(["goal", "contribute", "Holiday", "500", "--date", "2024-01-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 500.00 of 2000.00 (25.0%)"));

    fintrack(&dir)
        .args(["goal", "progress", "--as-of", "2024-02-01"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Holiday")
                .and(predicate::str::contains("Next milestone: Flights at 600.00")),
        );
}

#[test]
fn receipt_parse_extracts_fields_and_adds_expense() {
    let dir = initialized();
    let receipt = dir.path().join("receipt.txt");
    std::fs::write(
        &receipt,
        "Corner Deli\n\
         12 Market Street\n\
         05.12.2024\n\
         Sandwich        6,50\n\
         Coffee          2,90\n\
         TOTAL           9,40 EUR\n",
    )
    .unwrap();

    fintrack(&dir)
        .args(["receipt", "parse"])
        .arg(&receipt)
        .args(["--add", "--category", "Dining"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Merchant:  Corner Deli")
                .and(predicate::str::contains("Total:     €9.40"))
                .and(predicate::str::contains("Date:      2024-12-05"))
                .and(predicate::str::contains("Dining (suggested)"))
                .and(predicate::str::contains("Added expense Corner Deli (9.40) on 2024-12-05")),
        );

    fintrack(&dir)
        .args(["entry", "list", "--expenses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Corner Deli").and(predicate::str::contains("[Dining]")));
}

#[test]
fn receipt_parse_reads_stdin_as_json() {
    let dir = initialized();

    fintrack(&dir)
        .args(["receipt", "parse", "--json"])
        .write_stdin("WALMART\n2024-03-15\nTOTAL $45.67\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"total\": 4567")
                .and(predicate::str::contains("\"currency\": \"USD\""))
                .and(predicate::str::contains("\"date\": \"2024-03-15\""))
                .and(predicate::str::contains("\"suggestedCategory\": \"Groceries\"")),
        );
}

#[test]
fn receipt_scan_rejects_unsupported_files() {
    let dir = initialized();
    let document = dir.path().join("receipt.pdf");
    std::fs::write(&document, b"%PDF-1.4").unwrap();

    fintrack(&dir)
        .args(["receipt", "scan"])
        .arg(&document)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported image type"));
}

#[test]
fn history_lists_applied_commands() {
    let dir = initialized();

    fintrack(&dir)
        .args(["category", "create", "Pets"])
        .assert()
        .success();

    fintrack(&dir)
        .args(["history", "-n", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Category").and(predicate::str::contains("(Pets)")));
}
