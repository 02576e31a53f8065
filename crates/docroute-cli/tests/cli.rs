use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STATEMENT: &str = "Banco Itaú S.A.\nExtrato de conta corrente\nCPF 123.456.789-09\n\
    Período: 15/03/2024\nSaldo anterior R$ 1.234,56\n";

const NAME: &str = "2024-05-20_Extrato_Itau_R$1234,56.txt";

fn docroute(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docroute").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path()).env("HOME", home.path());
    cmd
}

fn write_statement(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, STATEMENT).unwrap();
    path
}

#[test]
fn analyze_prints_bundle_json() {
    let home = TempDir::new().unwrap();
    let input = write_statement(home.path(), "extrato.txt");

    docroute(&home)
        .arg("analyze")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"123.456.789-09\""))
        .stdout(predicate::str::contains("\"document_type\": \"extrato\""))
        .stdout(predicate::str::contains("\"bank\": \"itau\""));
}

#[test]
fn analyze_text_format() {
    let home = TempDir::new().unwrap();
    let input = write_statement(home.path(), "extrato.txt");

    docroute(&home)
        .args(["analyze", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Type: Extrato"))
        .stdout(predicate::str::contains("Bank: Itau"));
}

#[test]
fn analyze_missing_file_fails() {
    let home = TempDir::new().unwrap();

    docroute(&home)
        .args(["analyze", "/nonexistent/extrato.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn route_legacy_bundle_json() {
    let home = TempDir::new().unwrap();
    let bundle = r#"{"cpfs":["123.456.789-09"],"banco":"itau","tipo_documento":"extrato","datas":["15/03/2024"]}"#;

    docroute(&home)
        .args(["route", "--json", "--date", "2025-05-20", "--base-path", "/arquivo", "--bundle-json", bundle])
        .assert()
        .success()
        .stdout(predicate::str::contains("/arquivo/00_TRIAGEM_POR_PESSOA/CPF_TITULAR/Bancos"))
        .stdout(predicate::str::contains("/arquivo/05_BANCOS/Itau/CPF/Extratos/2024"))
        .stdout(predicate::str::contains("\"rule\": \"bank\""))
        .stdout(predicate::str::contains("2024-05-20_Extrato_Itau.pdf"));
}

#[test]
fn route_reports_missing_text() {
    let home = TempDir::new().unwrap();
    let scan = home.path().join("scan.txt");
    fs::write(&scan, "").unwrap();

    docroute(&home)
        .arg("route")
        .arg(&scan)
        .assert()
        .success()
        .stderr(predicate::str::contains("Sem texto extraído"))
        .stdout(predicate::str::contains("No rule matched"));
}

#[test]
fn route_requires_input_or_bundle() {
    let home = TempDir::new().unwrap();
    docroute(&home).arg("route").assert().failure();
}

#[test]
fn organize_copies_into_destinations() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();
    let input = write_statement(home.path(), "extrato.txt");

    docroute(&home)
        .arg("organize")
        .arg(&input)
        .arg("--base-path")
        .arg(archive.path())
        .args(["--date", "2025-05-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied to"));

    let bank_copy = archive.path().join("05_BANCOS/Itau/CPF/Extratos/2024").join(NAME);
    let triage_copy = archive
        .path()
        .join("00_TRIAGEM_POR_PESSOA/CPF_TITULAR/Bancos")
        .join(NAME);
    assert_eq!(fs::read_to_string(bank_copy).unwrap(), STATEMENT);
    assert!(triage_copy.exists());
    assert!(input.exists());
}

#[test]
fn organize_dry_run_writes_nothing() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();
    let input = write_statement(home.path(), "extrato.txt");

    docroute(&home)
        .arg("organize")
        .arg(&input)
        .arg("--base-path")
        .arg(archive.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would copy to"));

    assert!(!archive.path().join("05_BANCOS").exists());
}

#[test]
fn batch_writes_summary_and_continues() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();
    let inbox = home.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    write_statement(&inbox, "a.txt");
    fs::write(inbox.join("b.txt"), "nada aqui").unwrap();
    fs::write(inbox.join("c.pdf"), "not really a pdf").unwrap();
    let summary = home.path().join("summary.csv");

    docroute(&home)
        .arg("batch")
        .arg(format!("{}/*", inbox.display()))
        .arg("--base-path")
        .arg(archive.path())
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 3 files"));

    let csv = fs::read_to_string(&summary).unwrap();
    assert!(csv.starts_with("filename,status,document_type"));
    assert!(csv.contains("a.txt,filed,extrato,yes,2"));
    assert!(csv.contains("b.txt,unrouted"));
    assert!(csv.contains("c.pdf,unrouted,,no,0"));
}

#[test]
fn batch_files_documents_sharing_a_canonical_name() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();
    let inbox = home.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(inbox.join(name), "Contrato entre as partes, CPF 529.982.247-25").unwrap();
    }

    docroute(&home)
        .arg("batch")
        .arg(format!("{}/*.txt", inbox.display()))
        .arg("--base-path")
        .arg(archive.path())
        .args(["--date", "2025-05-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 filed, 0 unrouted, 0 failed"))
        .stdout(predicate::str::contains("Success rate: 100.0%"));

    let folder = archive
        .path()
        .join("00_TRIAGEM_POR_PESSOA/CPF_TITULAR/Documentos_Pessoais");
    let copies = fs::read_dir(&folder).unwrap().count();
    assert_eq!(copies, 3);
    assert!(folder.join("2025-05-20_Contrato.txt").exists());
}

#[test]
fn batch_without_matches_fails() {
    let home = TempDir::new().unwrap();

    docroute(&home)
        .arg("batch")
        .arg(format!("{}/*.pdf", home.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_set_get() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("docroute.json");

    docroute(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    docroute(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "routing.person_folder", "CPF_JOAO"])
        .assert()
        .success();

    docroute(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "routing.person_folder"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CPF_JOAO"));

    docroute(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "routing.base_path", "relativo"])
        .assert()
        .failure();
}

#[test]
fn configured_person_folder_is_used_for_routing() {
    let home = TempDir::new().unwrap();
    let archive = TempDir::new().unwrap();
    let config = home.path().join("docroute.json");
    fs::write(
        &config,
        format!(
            r#"{{"routing": {{"base_path": {:?}, "person_folder": "CPF_MARIA"}}}}"#,
            archive.path().display().to_string()
        ),
    )
    .unwrap();
    let input = write_statement(home.path(), "extrato.txt");

    docroute(&home)
        .arg("--config")
        .arg(&config)
        .arg("organize")
        .arg(&input)
        .assert()
        .success();

    assert!(archive
        .path()
        .join("00_TRIAGEM_POR_PESSOA/CPF_MARIA/Bancos")
        .is_dir());
}
