use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct ServerGuard {
    pub base_url: String,
    _data_dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[allow(dead_code)]
pub fn spawn_server() -> Result<ServerGuard> {
    spawn_server_with_seed(None)
}

pub fn spawn_server_with_seed(seed: Option<serde_json::Value>) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let addr_file = data_dir.path().join("addr.txt");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_widget-server"));
    cmd.args(["--addr", "127.0.0.1:0", "--addr-file"])
        .arg(&addr_file)
        .env("RUST_LOG", "warn")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    if let Some(seed) = seed {
        let seed_path = data_dir.path().join("seed.json");
        let bytes = serde_json::to_vec_pretty(&seed).context("serialize seed")?;
        std::fs::write(&seed_path, bytes).context("write seed")?;
        cmd.arg("--seed").arg(&seed_path);
    }

    let child = cmd.spawn().context("spawn widget-server")?;
    let mut guard = ServerGuard {
        base_url: String::new(),
        _data_dir: data_dir,
        child,
    };

    guard.base_url = read_addr_file(&addr_file)?;
    wait_for_health(&guard.base_url)?;
    Ok(guard)
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_health(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/health", base_url);
        }
        match client.get(format!("{}/health", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}
