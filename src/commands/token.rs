// src/commands/token.rs
// =============================================================================
// figma-json token set|get|remove|verify
//
// The handlers take the TokenStore as a parameter so tests can point them at
// a temporary directory.
// =============================================================================

use anyhow::{anyhow, bail, Result};

use super::SET_TOKEN_HINT;
use crate::cli::TokenAction;
use crate::figma::FigmaClient;
use crate::token::{mask_token, TokenStore};

pub async fn run(action: &TokenAction) -> Result<()> {
    let store = TokenStore::new()?;

    match action {
        TokenAction::Set { token, verify } => set(&store, token, *verify).await,
        TokenAction::Get { show, path } => get(&store, *show, *path),
        TokenAction::Remove { confirm } => remove(&store, *confirm),
        TokenAction::Verify => verify(&store).await,
    }
}

async fn set(store: &TokenStore, token: &str, verify: bool) -> Result<()> {
    if token.trim().is_empty() {
        bail!("token must not be empty");
    }

    if verify {
        println!("🔍 Verifying token...");
        if !FigmaClient::new(token)?.validate_token().await {
            bail!("the token was rejected by Figma, check your personal access token");
        }
        println!("✅ Token is valid");
    }

    store.set(token)?;
    println!("✅ Token saved");
    println!("   Config file: {}", store.config_path().display());
    Ok(())
}

fn get(store: &TokenStore, show: bool, path: bool) -> Result<()> {
    let token = stored_token(store)?;

    if show {
        println!("🔑 Current token:");
        println!("{}", token);
    } else {
        println!("🔑 Current token: {}", mask_token(&token));
        println!("   Use --show to print the whole token");
    }

    if path {
        println!("   Config file: {}", store.config_path().display());
    }
    Ok(())
}

fn remove(store: &TokenStore, confirm: bool) -> Result<()> {
    if !store.has() {
        println!("⚠️  No stored token found");
        return Ok(());
    }

    if !confirm {
        println!("⚠️  This will delete the stored token");
        println!("   Run again with --confirm to delete it");
        return Ok(());
    }

    store.remove()?;
    println!("✅ Token removed");
    Ok(())
}

async fn verify(store: &TokenStore) -> Result<()> {
    let token = stored_token(store)?;

    println!("🔍 Verifying token...");
    if !FigmaClient::new(&token)?.validate_token().await {
        bail!("the token is invalid or expired, update it with `figma-json token set <new-token>`");
    }

    println!("✅ Token is valid");
    Ok(())
}

fn stored_token(store: &TokenStore) -> Result<String> {
    store
        .get()
        .ok_or_else(|| anyhow!("no token set, {}", SET_TOKEN_HINT))
}
