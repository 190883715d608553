// tests/cli.rs
// End-to-end runs of the gh-folio binary. A throwaway HTTP server on
// localhost stands in for the GitHub API; state goes to a temp dir.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};
use std::thread;

// Answers every request from `routes` (path+query -> JSON body), 404 otherwise
fn serve(routes: &'static [(&'static str, &'static str)]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let target = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }

            let (status, body) = match routes.iter().find(|(path, _)| *path == target) {
                Some((_, body)) => ("200 OK", *body),
                None => ("404 Not Found", r#"{"message":"Not Found"}"#),
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{}", addr)
}

fn gh_folio(api_root: &str, state_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gh-folio"))
        .args(["--api-root", api_root])
        .arg("--state-file")
        .arg(state_dir.join("state.json"))
        .args(args)
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env("NO_PROXY", "127.0.0.1")
        .output()
        .unwrap()
}

#[test]
fn test_enriched_repos_json_is_the_only_stdout() {
    let api = serve(&[("/users/alice/repos?per_page=100&sort=updated", "[]")]);
    let dir = tempfile::tempdir().unwrap();

    let out = gh_folio(&api, dir.path(), &["repos", "alice", "--enrich", "--json"]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Inspecting 0 repositories"));
}

#[test]
fn test_state_commands_answer_in_json() {
    let dir = tempfile::tempdir().unwrap();
    // nothing here talks to the API
    let api = "http://127.0.0.1:9";

    let out = gh_folio(api, dir.path(), &["links", "add", "Blog", "https://alice.dev", "--json"]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed["saved"], "https://alice.dev");

    let out = gh_folio(api, dir.path(), &["links", "hide", "https://alice.dev", "--json"]);
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed["hidden"], true);
    assert_eq!(parsed["page"], "home");

    let out = gh_folio(api, dir.path(), &["token", "clear", "--json"]);
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed["token"], "cleared");
}

#[test]
fn test_missing_user_exits_with_one() {
    let api = serve(&[]);
    let dir = tempfile::tempdir().unwrap();

    let out = gh_folio(&api, dir.path(), &["profile", "nobody"]);
    assert_eq!(out.status.code(), Some(1));
}
