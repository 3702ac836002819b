use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use rusqlite::Connection;
use tempfile::TempDir;

const REPORT: &str = "General\n\
Complete name                            : Movie.2024.mkv\n\
Format                                   : Matroska\n\
Duration                                 : 2 h 1 min\n\
\n\
Video\n\
Format                                   : HEVC\n\
Width                                    : 3 840 pixels\n\
Height                                   : 2 160 pixels\n\
\n\
Audio\n\
Format                                   : E-AC-3\n\
Channel layout                           : L R C LFE Ls Rs\n\
Language                                 : English\n";

struct Env {
    _root: TempDir,
    config_home: PathBuf,
    data_home: PathBuf,
    db_path: PathBuf,
}

impl Env {
    /// Temp XDG dirs plus a config with cheap KDF settings.
    fn new() -> Self {
        let root = TempDir::new().expect("temp dir");
        let config_home = root.path().join("config");
        let data_home = root.path().join("data");
        let db_path = data_home.join("mediashare").join("shares.db");

        let config_path = config_home.join("mediashare").join("config.toml");
        std::fs::create_dir_all(config_path.parent().unwrap()).expect("create config dir");
        std::fs::write(
            &config_path,
            format!(
                "[store]\npath = \"{}\"\n\n[crypto]\nmemory_kib = 1024\niterations = 1\nparallelism = 1\n",
                db_path.to_string_lossy()
            ),
        )
        .expect("write config");

        Self {
            _root: root,
            config_home,
            data_home,
            db_path,
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_mediashare"));
        cmd.args(args)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("XDG_DATA_HOME", &self.data_home)
            .env_remove("MEDIASHARE_DB")
            .env_remove("MEDIASHARE_CONFIG")
            .env_remove("MEDIASHARE_PASSWORD")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("run mediashare")
    }

    fn run_with_password(&self, args: &[&str], password: &str) -> Output {
        self.command(args)
            .env("MEDIASHARE_PASSWORD", password)
            .output()
            .expect("run mediashare")
    }

    fn init(&self) {
        let output = self.run(&["init"]);
        assert!(output.status.success(), "init failed: {}", stderr(&output));
    }

    fn create(&self, content: &str) -> String {
        let output = self.run(&["create", "--content", content, "--lifetime", "2h"]);
        assert!(output.status.success(), "create failed: {}", stderr(&output));
        stdout(&output).trim().to_string()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn expire_in_place(db_path: &Path, id: &str) {
    let conn = Connection::open(db_path).expect("open db");
    let updated = conn
        .execute(
            "UPDATE entries SET created_at = ?, expires_at = ? WHERE id = ?",
            ["2020-01-01T00:00:00.000000Z", "2020-01-01T01:00:00.000000Z", id],
        )
        .expect("age entry");
    assert_eq!(updated, 1);
}

#[test]
fn test_create_fetch_round_trip() {
    let env = Env::new();
    env.init();
    assert!(env.db_path.exists());

    let id = env.create(REPORT);
    assert_eq!(id.len(), 36);

    let output = env.run(&["fetch", &id]);
    assert!(output.status.success(), "fetch failed: {}", stderr(&output));
    assert_eq!(stdout(&output), REPORT);

    // A full link works as well as the bare id.
    let link = format!("https://share.example/m/{}", id);
    let output = env.run(&["fetch", &link]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), REPORT);
}

#[test]
fn test_create_reads_stdin() {
    let env = Env::new();
    env.init();

    let mut child = env
        .command(&["create", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn create");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(REPORT.as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait create");
    assert!(output.status.success(), "create failed: {}", stderr(&output));

    let id = stdout(&output).trim().to_string();
    assert_eq!(stdout(&env.run(&["fetch", &id])), REPORT);
}

#[test]
fn test_protected_share_requires_password() {
    let env = Env::new();
    env.init();

    let output = env.run_with_password(&["create", "--content", REPORT, "--json"], "hunter2");
    assert!(output.status.success(), "create failed: {}", stderr(&output));
    let created: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(created["protected"], true);
    let id = created["id"].as_str().expect("id").to_string();

    let output = env.run(&["fetch", &id, "--no-input"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("password protected"));

    let output = env.run_with_password(&["fetch", &id], "wrong");
    assert_eq!(output.status.code(), Some(5));

    let output = env.run_with_password(&["fetch", &id], "hunter2");
    assert!(output.status.success(), "fetch failed: {}", stderr(&output));
    assert_eq!(stdout(&output), REPORT);

    // Sealed content never hits the file in the clear.
    let bytes = std::fs::read(&env.db_path).expect("read db");
    let needle = b"Movie.2024.mkv";
    assert!(!bytes.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn test_no_password_ignores_env() {
    let env = Env::new();
    env.init();

    let output = env.run_with_password(
        &["create", "--content", REPORT, "--no-password", "--json"],
        "hunter2",
    );
    assert!(output.status.success());
    let created: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(created["protected"], false);
}

#[test]
fn test_missing_and_expired_look_the_same() {
    let env = Env::new();
    env.init();

    let id = env.create(REPORT);
    expire_in_place(&env.db_path, &id);

    let expired = env.run(&["fetch", &id]);
    let missing = env.run(&["fetch", "7a2e3c0b-1234-4678-9abc-def012345678"]);

    assert_eq!(expired.status.code(), Some(3));
    assert_eq!(missing.status.code(), Some(3));
    assert_eq!(stderr(&expired), stderr(&missing));
    assert!(stderr(&expired).contains("Link unavailable"));
}

#[test]
fn test_invalid_input_exit_code() {
    let env = Env::new();
    env.init();

    let output = env.run(&["fetch", "not-a-share-id"]);
    assert_eq!(output.status.code(), Some(4));

    let output = env.run(&["create", "--content", "   \n"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("empty"));

    let output = env.run(&["create", "--content", REPORT, "--lifetime", "0"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_lifetime_is_clamped_by_default() {
    let env = Env::new();
    env.init();

    let output = env.run(&["create", "--content", REPORT, "--lifetime", "3d"]);
    assert!(output.status.success());
    let id = stdout(&output).trim().to_string();

    let output = env.run(&["info", &id, "--json"]);
    let info: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let remaining = info["remaining_seconds"].as_i64().expect("remaining");
    assert!(remaining <= 24 * 3600);
    assert!(remaining > 23 * 3600);
}

#[test]
fn test_missing_database_message() {
    let env = Env::new();

    let output = env.run(&["fetch", "7a2e3c0b-1234-4678-9abc-def012345678"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("No share database found"));
    assert!(stderr(&output).contains("mediashare init"));
}

#[test]
fn test_info_does_not_reveal_content() {
    let env = Env::new();
    env.init();
    let id = env.create(REPORT);

    let output = env.run(&["info", &id]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains(&id));
    assert!(text.contains("Protected: no"));
    assert!(!text.contains("Matroska"));
}

#[test]
fn test_fetch_summary_json() {
    let env = Env::new();
    env.init();
    let id = env.create(REPORT);

    let output = env.run(&["fetch", &id, "--summary", "--json"]);
    assert!(output.status.success(), "fetch failed: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let report = &value["report"];
    assert_eq!(report["general"]["format"], "Matroska");
    assert_eq!(report["video"]["format"], "HEVC");
    assert_eq!(report["audio"][0]["channels"], "5.1");
}

#[test]
fn test_delete_then_fetch() {
    let env = Env::new();
    env.init();
    let id = env.create(REPORT);

    let output = env.run(&["delete", &id]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Deleted"));

    assert_eq!(env.run(&["fetch", &id]).status.code(), Some(3));
    assert_eq!(env.run(&["delete", &id]).status.code(), Some(3));
}

#[test]
fn test_delete_of_expired_share_reports_unavailable() {
    let env = Env::new();
    env.init();
    let id = env.create(REPORT);
    expire_in_place(&env.db_path, &id);

    let expired = env.run(&["delete", &id]);
    let missing = env.run(&["delete", "7a2e3c0b-1234-4678-9abc-def012345678"]);
    assert_eq!(expired.status.code(), Some(3));
    assert_eq!(stderr(&expired), stderr(&missing));
    assert!(!stdout(&expired).contains("Deleted"));

    let conn = Connection::open(&env.db_path).expect("open db");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 0);
}

#[test]
fn test_reap_removes_only_expired() {
    let env = Env::new();
    env.init();
    let stale = env.create(REPORT);
    let fresh = env.create(REPORT);
    expire_in_place(&env.db_path, &stale);

    let output = env.run(&["reap", "--json"]);
    assert!(output.status.success(), "reap failed: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["removed"], 1);

    let conn = Connection::open(&env.db_path).expect("open db");
    let remaining: Vec<String> = conn
        .prepare("SELECT id FROM entries")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(remaining, vec![fresh]);
}

#[test]
fn test_check_reports_ok() {
    let env = Env::new();
    env.init();
    env.create(REPORT);

    let output = env.run(&["check"]);
    assert!(output.status.success(), "check failed: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("entries=1"));
    assert!(text.contains("status=ok"));
}

#[test]
fn test_check_flags_broken_rows() {
    let env = Env::new();
    env.init();
    let id = env.create(REPORT);

    let conn = Connection::open(&env.db_path).expect("open db");
    conn.execute("UPDATE entries SET protected = 1 WHERE id = ?", [&id])
        .expect("corrupt row");
    drop(conn);

    let output = env.run(&["check"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("status=failed"));
}

#[test]
fn test_init_writes_config_once() {
    let root = TempDir::new().expect("temp dir");
    let config_home = root.path().join("config");
    let data_home = root.path().join("data");
    let run = |args: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_mediashare"))
            .args(args)
            .env("XDG_CONFIG_HOME", &config_home)
            .env("XDG_DATA_HOME", &data_home)
            .env_remove("MEDIASHARE_DB")
            .env_remove("MEDIASHARE_CONFIG")
            .stdin(Stdio::null())
            .output()
            .expect("run mediashare")
    };

    let output = run(&["init"]);
    assert!(output.status.success(), "init failed: {}", stderr(&output));
    assert!(data_home.join("mediashare").join("mediashare.db").exists());

    let config_path = config_home.join("mediashare").join("config.toml");
    let config = std::fs::read_to_string(&config_path).expect("config written");
    assert!(config.contains("[limits]"));
    assert!(config.contains("mediashare.db"));

    let output = run(&["init"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("already exists"));
    assert!(stdout(&output).contains("Kept existing config"));
}

#[test]
fn test_completions_generate() {
    let env = Env::new();
    let output = env.run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("mediashare"));
}
