// src/main.rs
// =============================================================================
// This is the entry point of the gh-folio CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) and the GitHub client
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the result as a table or as JSON
// 5. Exit with proper code (0 = success, 1 = not found / empty, 2 = error)
//
// The CLI is the "UI layer" for the library: it is the one that asks the
// user for a new token when GitHub rejects the current one.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use serde::Serialize;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, LinkAction, ThemeChoice, TokenAction};
use gh_folio::github::{
    pick_default, ContentEntry, ContentView, CredentialPrompt, GithubClient, ReadmeFormat,
    RepoBrowser, RepoCoordinate, TokenSource,
};
use gh_folio::state::{CustomLink, StateStore, Theme};
use gh_folio::{Config, GithubError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins; otherwise -v / -vv pick the level for our own crate
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,gh_folio={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// "Nothing there" is not the same as "something broke"
fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<GithubError>() {
        Some(e) if e.is_not_found() => 1,
        _ => 2,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let g = &cli.global;
    let config = Config::new(
        &g.api_root,
        &g.raw_root,
        g.token.clone(),
        g.state_file.clone(),
        g.timeout_secs,
        g.concurrency,
    )?;
    let (client, state) = config
        .connect()
        .context("Failed to set up the GitHub client")?;
    let json = g.json;

    match cli.command {
        Commands::Profile { username } => handle_profile(&client, &username, json).await,
        Commands::Repos {
            username,
            enrich,
            no_forks,
        } => handle_repos(&client, &config, &username, enrich, no_forks, json).await,
        Commands::Branches { repo } => handle_branches(&client, &repo, json).await,
        Commands::Ls { repo, path, r#ref } => {
            handle_ls(&client, &repo, &path, r#ref.as_deref(), json).await
        }
        Commands::Cat { repo, path, r#ref } => {
            handle_cat(&client, &repo, &path, r#ref.as_deref(), json).await
        }
        Commands::Readme {
            repo,
            r#ref,
            markdown,
        } => handle_readme(&client, &repo, r#ref.as_deref(), markdown, json).await,
        Commands::Inspect { repo } => handle_inspect(&client, &repo, json).await,
        Commands::Token { action } => handle_token(&client, action, json).await,
        Commands::Theme { choice } => handle_theme(&state, choice, json),
        Commands::Links { action } => handle_links(&state, action, json),
    }
}

// Asks on the terminal. Piped/non-interactive runs get no prompt.
struct TerminalPrompt;

#[async_trait]
impl CredentialPrompt for TerminalPrompt {
    async fn request_credential(&self, reason: &GithubError) -> Option<String> {
        if !std::io::stdin().is_terminal() {
            return None;
        }
        eprintln!("⚠️  {}", reason);
        eprint!("🔑 GitHub token (empty to cancel): ");
        tokio::task::spawn_blocking(read_token_line).await.ok().flatten()
    }
}

fn read_token_line() -> Option<String> {
    let mut line = String::new();
    std::io::stdin().read_line(&mut line).ok()?;
    let token = line.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn parse_repo(input: &str) -> Result<RepoCoordinate> {
    RepoCoordinate::parse(input).with_context(|| format!("Can't read '{}' as owner/repo", input))
}

async fn handle_profile(client: &GithubClient, username: &str, json: bool) -> Result<()> {
    let profile = client
        .with_credential_retry(&TerminalPrompt, || client.user_profile(username))
        .await
        .with_context(|| format!("Failed to load profile for {}", username))?;

    if json {
        return print_json(&profile);
    }

    println!("👤 {} ({})", profile.name.as_deref().unwrap_or(&profile.login), profile.login);
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.is_empty()) {
        println!("   {}", bio);
    }
    if let Some(location) = profile.location.as_deref().filter(|l| !l.is_empty()) {
        println!("📍 {}", location);
    }
    if let Some(blog) = profile.blog.as_deref().filter(|b| !b.is_empty()) {
        println!("🔗 {}", blog);
    }
    println!("🌐 {}", profile.html_url);
    println!(
        "📊 {} repos · {} followers · {} following",
        profile.public_repos, profile.followers, profile.following
    );
    Ok(())
}

async fn handle_repos(
    client: &GithubClient,
    config: &Config,
    username: &str,
    enrich: bool,
    no_forks: bool,
    json: bool,
) -> Result<()> {
    let mut repos = client
        .with_credential_retry(&TerminalPrompt, || client.user_repositories(username))
        .await
        .with_context(|| format!("Failed to list repositories for {}", username))?;

    if no_forks {
        repos.retain(|r| !r.fork);
    }

    if !enrich {
        if json {
            return print_json(&repos);
        }
        println!("{:<32} {:<14} {:>6}  {}", "NAME", "LANGUAGE", "STARS", "DESCRIPTION");
        println!("{}", "=".repeat(100));
        for repo in &repos {
            println!(
                "{:<32} {:<14} {:>6}  {}",
                truncate(&repo.name, 31),
                repo.language.as_deref().unwrap_or("-"),
                repo.stargazers_count,
                truncate(repo.description.as_deref().unwrap_or(""), 45)
            );
        }
        println!("\n📋 {} repositories", repos.len());
        return Ok(());
    }

    // progress goes to stderr so stdout stays clean for --json
    eprintln!("🔍 Inspecting {} repositories...", repos.len());
    let coords: Vec<RepoCoordinate> = repos.iter().map(|r| r.coordinate()).collect();
    let enrichments = client.enrich_all(&coords, config.concurrency).await;

    if json {
        #[derive(Serialize)]
        struct Row<'a> {
            #[serde(flatten)]
            repo: &'a gh_folio::github::RepoSummary,
            enrichment: &'a gh_folio::probe::Enrichment,
        }
        let rows: Vec<Row> = repos
            .iter()
            .zip(&enrichments)
            .map(|(repo, enrichment)| Row { repo, enrichment })
            .collect();
        return print_json(&rows);
    }

    println!("{:<32} {:<14} {:<6} {}", "NAME", "DETECTED", "HTML", "DEMO");
    println!("{}", "=".repeat(100));
    for (repo, e) in repos.iter().zip(&enrichments) {
        let demo = e
            .manifest_homepage
            .as_ref()
            .map(|m| m.homepage.as_str())
            .or(repo.homepage.as_deref().filter(|h| !h.is_empty()))
            .unwrap_or("-");
        println!(
            "{:<32} {:<14} {:<6} {}",
            truncate(&repo.name, 31),
            e.language.as_deref().unwrap_or("-"),
            if e.has_live_page { "yes" } else { "no" },
            demo
        );
    }
    Ok(())
}

async fn handle_branches(client: &GithubClient, repo: &str, json: bool) -> Result<()> {
    let coord = parse_repo(repo)?;
    let branches = client
        .with_credential_retry(&TerminalPrompt, || client.list_branches(&coord))
        .await
        .with_context(|| format!("Failed to list branches of {}", coord))?;

    let default = pick_default(&branches, &coord)?.name.clone();

    if json {
        return print_json(&serde_json::json!({
            "default": default,
            "branches": branches,
        }));
    }

    for branch in &branches {
        let marker = if branch.name == default { "*" } else { " " };
        println!("{} {:<40} {}", marker, branch.name, short_sha(&branch.commit));
    }
    Ok(())
}

async fn handle_ls(
    client: &GithubClient,
    repo: &str,
    path: &str,
    pinned: Option<&str>,
    json: bool,
) -> Result<()> {
    let coord = parse_repo(repo)?;
    let coord = &coord;

    let browser = client
        .with_credential_retry(&TerminalPrompt, || async move {
            let mut browser = RepoBrowser::open(client, coord.clone(), pinned).await?;
            if !path.trim_matches('/').is_empty() {
                browser.enter(client, path).await?;
            }
            Ok::<_, GithubError>(browser)
        })
        .await
        .with_context(|| format!("Failed to list {}:{}", coord, path))?;

    let entries = directory_entries(browser.view())?;

    if json {
        return print_json(&serde_json::json!({
            "context": browser.context(),
            "entries": entries,
        }));
    }

    let ctx = browser.context();
    println!("📁 {}:{} @ {}", ctx.repository, if ctx.path.is_empty() { "/" } else { ctx.path.as_str() }, ctx.r#ref);
    for entry in entries {
        let icon = match entry.kind {
            gh_folio::github::EntryKind::Dir => "📁",
            gh_folio::github::EntryKind::File => "📄",
            gh_folio::github::EntryKind::Symlink => "🔗",
            gh_folio::github::EntryKind::Submodule => "📦",
        };
        println!("{} {:<50} {:>10}", icon, entry.name, entry.size);
    }
    Ok(())
}

fn directory_entries(view: &ContentView) -> Result<&[ContentEntry]> {
    match view {
        ContentView::Directory { entries, .. } => Ok(entries.as_slice()),
        ContentView::File(body) => anyhow::bail!("{} is a file, try `cat`", body.path),
    }
}

async fn handle_cat(
    client: &GithubClient,
    repo: &str,
    path: &str,
    pinned: Option<&str>,
    json: bool,
) -> Result<()> {
    let coord = parse_repo(repo)?;
    let body = client
        .with_credential_retry(&TerminalPrompt, || client.get_file(&coord, path, pinned))
        .await
        .with_context(|| format!("Failed to read {}:{}", coord, path))?;

    if json {
        return print_json(&serde_json::json!({
            "path": body.path,
            "encoding": body.encoding,
            "size": body.bytes.len(),
            "content": body.text(),
        }));
    }

    print!("{}", body.text());
    Ok(())
}

async fn handle_readme(
    client: &GithubClient,
    repo: &str,
    pinned: Option<&str>,
    markdown: bool,
    json: bool,
) -> Result<()> {
    let coord = parse_repo(repo)?;
    let format = if markdown {
        ReadmeFormat::Markdown
    } else {
        ReadmeFormat::Html
    };

    let readme = client
        .with_credential_retry(&TerminalPrompt, || client.readme(&coord, pinned, format))
        .await
        .with_context(|| format!("Failed to load the README of {}", coord))?;

    if json {
        return print_json(&readme);
    }

    if let Some(source) = &readme.markdown {
        println!("<!-- markdown ({}) -->\n{}\n<!-- html -->", readme.r#ref, source);
    }
    println!("{}", readme.html);
    Ok(())
}

async fn handle_inspect(client: &GithubClient, repo: &str, json: bool) -> Result<()> {
    let coord = parse_repo(repo)?;
    let enrichment = client.enrich(&coord).await;

    if json {
        return print_json(&enrichment);
    }

    println!("🔍 {}", enrichment.repository);
    println!("   Language:  {}", enrichment.language.as_deref().unwrap_or("unknown"));
    println!("   Live page: {}", if enrichment.has_live_page { "yes" } else { "no" });
    match &enrichment.manifest_homepage {
        Some(m) => println!("   Demo:      {} (package.json on {})", m.homepage, m.branch),
        None => println!("   Demo:      none found"),
    }
    if !enrichment.soft_failures.is_empty() {
        println!("   ({} lookups came back empty, -v for details)", enrichment.soft_failures.len());
        for failure in &enrichment.soft_failures {
            tracing::info!("{}: {}", failure.context, failure.reason);
        }
    }
    Ok(())
}

async fn handle_token(client: &GithubClient, action: TokenAction, json: bool) -> Result<()> {
    let tokens = client.tokens();
    match action {
        TokenAction::Set { value } => {
            let value = match value {
                Some(v) => Some(v),
                None => tokio::task::spawn_blocking(read_token_line).await?,
            };
            let value = value
                .filter(|v| !v.trim().is_empty())
                .context("No token given")?;
            tokens.set(&value).context("Failed to store the token")?;
            if tokens.source() == Some(TokenSource::Environment) {
                eprintln!("⚠️  Stored, but GITHUB_TOKEN is set and takes precedence");
            }
            report(json, serde_json::json!({ "token": "stored" }), "✅ Token stored")?;
        }
        TokenAction::Clear => {
            tokens.clear().context("Failed to clear the token")?;
            report(json, serde_json::json!({ "token": "cleared" }), "✅ Stored token cleared")?;
        }
        TokenAction::Status => {
            let source = match tokens.source() {
                Some(TokenSource::Environment) => "environment",
                Some(TokenSource::Persisted) => "stored",
                None => "none",
            };
            if json {
                return print_json(&serde_json::json!({ "source": source }));
            }
            println!("🔑 Active token: {}", source);
        }
    }
    Ok(())
}

fn handle_theme(state: &StateStore, choice: Option<ThemeChoice>, json: bool) -> Result<()> {
    let theme = match choice {
        None => state.theme(),
        Some(choice) => {
            let next = match choice {
                ThemeChoice::Light => Theme::Light,
                ThemeChoice::Dark => Theme::Dark,
                ThemeChoice::Toggle => state.theme().toggled(),
            };
            state.set_theme(next).context("Failed to save the theme")?;
            next
        }
    };

    if json {
        return print_json(&serde_json::json!({ "theme": theme }));
    }
    println!("🎨 {}", theme);
    Ok(())
}

fn handle_links(state: &StateStore, action: LinkAction, json: bool) -> Result<()> {
    match action {
        LinkAction::List { page } => {
            let links = state.arrange(&page, state.custom_links(), |l| l.url.as_str());
            if json {
                return print_json(&links);
            }
            for (i, link) in links.iter().enumerate() {
                println!("{:>3}  {:<24} {}", i, link.label, link.url);
            }
        }
        LinkAction::Add { label, url } => {
            let status = serde_json::json!({ "saved": url });
            state.add_custom_link(CustomLink { label, url })?;
            report(json, status, "✅ Link saved")?;
        }
        LinkAction::Remove { url } => {
            let removed = state.remove_custom_link(&url)?;
            let text = if removed {
                "✅ Link removed"
            } else {
                "⚠️  No link with that URL"
            };
            report(json, serde_json::json!({ "url": url, "removed": removed }), text)?;
        }
        LinkAction::Move { from, to, page } => {
            let shown: Vec<String> = state
                .arrange(&page, state.custom_links(), |l| l.url.as_str())
                .into_iter()
                .map(|l| l.url)
                .collect();
            let order = state.move_link(&page, &shown, from, to)?;
            report(
                json,
                serde_json::json!({ "page": page, "order": order }),
                &format!("✅ Moved link {} to {}", from, to),
            )?;
        }
        LinkAction::Hide { url, page } => {
            state.hide_link(&page, &url)?;
            report(
                json,
                serde_json::json!({ "page": page, "url": url, "hidden": true }),
                &format!("🙈 Hidden on {}", page),
            )?;
        }
        LinkAction::Unhide { url, page } => {
            let was_hidden = state.unhide_link(&page, &url)?;
            let text = if was_hidden {
                format!("👀 Visible on {} again", page)
            } else {
                format!("⚠️  That link wasn't hidden on {}", page)
            };
            report(
                json,
                serde_json::json!({ "page": page, "url": url, "hidden": false, "changed": was_hidden }),
                &text,
            )?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json_output = serde_json::to_string_pretty(value)?;
    println!("{}", json_output);
    Ok(())
}

// Outcome of a command that changes state: a status object under --json,
// a one-line message otherwise
fn report(json: bool, status: serde_json::Value, text: &str) -> Result<()> {
    println!("{}", render_report(json, &status, text)?);
    Ok(())
}

fn render_report(json: bool, status: &serde_json::Value, text: &str) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(status)?)
    } else {
        Ok(text.to_string())
    }
}

// Truncate for table display, counting characters, not bytes
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does run() return anyhow::Result but the library uses GithubError?
//    - The library's callers need to match on what went wrong (for example
//      to decide whether to ask for a new token)
//    - Here we only need to print the error and pick an exit code
//    - downcast_ref() lets us peek at the original GithubError anyway
//
// 2. What is `|| async move { ... }`?
//    - A closure that builds a fresh future every time it is called
//    - with_credential_retry() may call it twice, so it can't be a single
//      future (futures can only be awaited once)
//    - `move` copies the references into the future so it doesn't borrow
//      from the closure itself
//
// 3. Why spawn_blocking for reading stdin?
//    - Reading a line blocks the thread until the user presses Enter
//    - spawn_blocking moves that onto a thread meant for blocking work so
//      the async runtime's worker threads stay free
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("0123456789abcdef"), "0123456");
        assert_eq!(short_sha("abc"), "abc");
    }

    #[test]
    fn test_file_view_is_not_a_listing() {
        let file = ContentView::File(gh_folio::github::FileBody {
            path: "README.md".into(),
            bytes: b"# hi".to_vec(),
            encoding: gh_folio::github::BodyEncoding::Plain,
        });
        let err = directory_entries(&file).unwrap_err();
        assert!(err.to_string().contains("README.md is a file"));

        let dir = ContentView::Directory { path: String::new(), entries: Vec::new() };
        assert!(directory_entries(&dir).unwrap().is_empty());
    }

    #[test]
    fn test_report_is_json_under_json_flag() {
        let status = serde_json::json!({ "url": "https://x.dev", "removed": true });

        let out = render_report(true, &status, "✅ Link removed").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, status);

        assert_eq!(render_report(false, &status, "✅ Link removed").unwrap(), "✅ Link removed");
    }

    #[test]
    fn test_exit_codes() {
        let not_found = anyhow::Error::from(GithubError::NotFound("x".into())).context("loading");
        assert_eq!(exit_code_for(&not_found), 1);

        let empty = anyhow::Error::from(GithubError::EmptyRepository("a/b".into()));
        assert_eq!(exit_code_for(&empty), 1);

        let other = anyhow::anyhow!("boom");
        assert_eq!(exit_code_for(&other), 2);
    }
}
