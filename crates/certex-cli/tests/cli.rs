use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const CERTIFICATE: &str = r#"Свидетельство о безопасности конструкции транспортного средства № ТС BY А-BY.1739.14360
МАРКА VOLVO
КОММЕРЧЕСКОЕ НАИМЕНОВАНИЕ FH
ТИП FH 4X2
ШАССИ ОТСУТСТВУЕТ
ИДЕНТИФИКАЦИОННЫЙ НОМЕР (VIN) YV2RT40A5KB123456
ГОД ВЫПУСКА 2019
КАТЕГОРИЯ N3
ЭКОЛОГИЧЕСКИЙ КЛАСС ПЯТЫЙ
ЗАЯВИТЕЛЬ И ЕГО АДРЕС ООО "ТРАК ИМПОРТ"
220000, г. Минск, ул. Промышленная, 1
ИЗГОТОВИТЕЛЬ И ЕГО АДРЕС VOLVO TRUCK CORPORATION
Швеция, Гётеборг
ОБЩИЕ ХАРАКТЕРИСТИКИ ТРАНСПОРТНОГО СРЕДСТВА
Колесная формула / ведущие колеса 4x2 / задние
Грузоподъемность, кг 11150
Шины 315/70R22.5
Дата оформления "05" мая 2025
"#;

/// `certex` with configuration isolated from the user's home.
fn certex(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("certex").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn process_prints_json_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("volvo.txt");
    fs::write(&input, CERTIFICATE).unwrap();

    certex(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"vin\": \"YV2RT40A5KB123456\""))
        .stdout(predicate::str::contains("\"payload\": \"11150\""))
        .stdout(predicate::str::contains("\"issue_date\": \"05.05.2025\""));
}

#[test]
fn process_enriches_from_datasets() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("volvo.txt");
    let climate = dir.path().join("climate.csv");
    let registry = dir.path().join("journal.csv");
    fs::write(&input, CERTIFICATE).unwrap();
    fs::write(&climate, "Дата;Температура;Влажность\n05.05.2025;18,5;62\n").unwrap();
    fs::write(
        &registry,
        "№ п/п;Дата заявки;Регистрационный номер СБКТС;Инженер\n\
         7;02.05.2025;ТС BY А-BY.1739.14360;Петров\n",
    )
    .unwrap();

    certex(dir.path())
        .arg("process")
        .arg(&input)
        .arg("--climate")
        .arg(&climate)
        .arg("--registry")
        .arg(&registry)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registry: #7 filed 02.05.2025 by Петров"))
        .stdout(predicate::str::contains("Temperature: 18.5"))
        .stdout(predicate::str::contains("Humidity: 62"))
        .stdout(predicate::str::contains(
            "Reference data: climate table available, registry journal available",
        ));
}

#[test]
fn process_rejects_record_without_vin() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("partial.txt");
    fs::write(&input, "МАРКА VOLVO\nГОД ВЫПУСКА 2019\n").unwrap();

    certex(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing mandatory fields: vin"));
}

#[test]
fn batch_writes_table_and_flags_duplicate_vins() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let out = dir.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), CERTIFICATE).unwrap();
    fs::write(input.join("b.txt"), CERTIFICATE).unwrap();
    fs::write(input.join("c.txt"), "МАРКА VOLVO\n").unwrap();

    certex(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", input.display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--table", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed files:"))
        .stdout(predicate::str::contains("c.txt"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());
    assert!(!out.join("c.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("a.txt,success,VOLVO,YV2RT40A5KB123456,2019"));
    assert!(summary.contains("c.txt,failed"));

    let mut rdr = csv::Reader::from_path(out.join("vehicles.csv")).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let id = headers.iter().position(|h| h == "id").unwrap();
    let suspicious = headers.iter().position(|h| h == "suspicious").unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][id], "1");
    assert_eq!(&rows[1][id], "2");
    assert!(rows.iter().all(|r| &r[suspicious] == "true"));
    assert!(out.join("vehicles.db").exists());
}

#[test]
fn batch_keeps_good_records_when_a_document_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let out = dir.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), CERTIFICATE).unwrap();
    fs::write(input.join("z.txt"), CERTIFICATE.replace("YV2RT40A5KB123456", "")).unwrap();

    certex(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", input.display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--table", "-j", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"))
        .stdout(predicate::str::contains("z.txt"));

    assert!(out.join("a.json").exists());
    assert!(!out.join("z.json").exists());

    let mut rdr = csv::Reader::from_path(out.join("vehicles.csv")).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
}

#[test]
fn batch_strict_reports_failure_after_writing_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let out = dir.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), CERTIFICATE).unwrap();
    fs::write(input.join("z.txt"), "МАРКА VOLVO\n").unwrap();

    certex(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", input.display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 documents failed"));

    assert!(out.join("a.json").exists());
    assert!(out.join("summary.csv").exists());
}

#[test]
fn batch_flags_duplicate_vin_from_an_earlier_run() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    let database = dir.path().join("vehicles.db");
    fs::create_dir(&first).unwrap();
    fs::create_dir(&second).unwrap();
    fs::write(first.join("a.txt"), CERTIFICATE).unwrap();
    fs::write(second.join("b.txt"), CERTIFICATE).unwrap();

    for (input, out) in [(&first, "out1"), (&second, "out2")] {
        certex(dir.path())
            .arg("batch")
            .arg(format!("{}/*.txt", input.display()))
            .arg("--output-dir")
            .arg(dir.path().join(out))
            .arg("--database")
            .arg(&database)
            .assert()
            .success();
    }

    let mut rdr = csv::Reader::from_path(dir.path().join("out2").join("vehicles.csv")).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][col("source_document")], "a.txt");
    assert_eq!(&rows[1][col("source_document")], "b.txt");
    assert_eq!(&rows[1][col("id")], "2");
    assert!(rows.iter().all(|r| &r[col("suspicious")] == "true"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = tempfile::tempdir().unwrap();

    certex(dir.path())
        .arg("batch")
        .arg(format!("{}/*.pdf", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_set_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("certex.json");
    let config_arg = config.to_str().unwrap();

    certex(dir.path())
        .args(["-c", config_arg, "config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    certex(dir.path())
        .args(["-c", config_arg, "config", "set", "extraction.default_category", "O4"])
        .assert()
        .success();

    certex(dir.path())
        .args(["-c", config_arg, "config", "get", "extraction.default_category"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"O4\""));
}

#[test]
fn config_path_points_to_certex_dir() {
    let dir = tempfile::tempdir().unwrap();

    certex(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("certex config init"));
}
