//! Command implementations for the `stackboard` binary.

use std::io::{self, Write};

use anyhow::Result;
use tracing::warn;

use stackboard_core::api::{ApiError, CatalogClient, Loaded};
use stackboard_core::auth::CredentialStore;
use stackboard_core::config::Config;
use stackboard_core::models::{Category, LoginResponse, Product, ProductsResponse};
use stackboard_core::utils::{format_date, format_price, format_rating, truncate_string};

/// Maximum title width in product listings
const TITLE_WIDTH: usize = 40;

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user was sent to `stackboard login`
    AuthRequired,
}

// ============================================================================
// Session commands
// ============================================================================

/// Where remembered passwords live
pub trait PasswordVault {
    fn get(&self, username: &str) -> Option<String>;
    fn store(&self, username: &str, password: &str) -> Result<()>;
    fn delete(&self, username: &str) -> Result<()>;
}

/// The OS keychain
pub struct Keychain;

impl PasswordVault for Keychain {
    fn get(&self, username: &str) -> Option<String> {
        CredentialStore::get_password(username).unwrap_or_else(|e| {
            warn!(error = %e, "Keychain unavailable, prompting for password");
            None
        })
    }

    fn store(&self, username: &str, password: &str) -> Result<()> {
        CredentialStore::store(username, password)
    }

    fn delete(&self, username: &str) -> Result<()> {
        CredentialStore::delete(username)
    }
}

pub async fn login(
    catalog: &CatalogClient,
    config: &mut Config,
    username: Option<String>,
    remember: bool,
) -> Result<Outcome> {
    let username = match username {
        Some(u) => u,
        None => prompt_username(config.last_username.as_deref())?,
    };
    if username.is_empty() {
        return Err(anyhow::anyhow!("Username required"));
    }

    let login = sign_in(catalog, &Keychain, &username, remember, || {
        Ok(rpassword::prompt_password("Password: ")?)
    })
    .await?;

    println!("Signed in as {}", login.display_name(&username));

    config.last_username = Some(username);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    Ok(Outcome::Done)
}

/// Log in with the remembered password if there is one, else with a
/// prompted one. A remembered password the API rejects is forgotten and
/// the prompt is used instead.
async fn sign_in<P>(
    catalog: &CatalogClient,
    vault: &dyn PasswordVault,
    username: &str,
    remember: bool,
    prompt: P,
) -> Result<LoginResponse>
where
    P: FnOnce() -> Result<String>,
{
    if let Some(saved) = vault.get(username) {
        eprintln!("Using remembered password for {}", username);
        match catalog.login(username, &saved).await {
            Ok(login) => return Ok(login),
            Err(e) if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::LoginFailed(_))) => {
                eprintln!("Remembered password was rejected, forgetting it");
                if let Err(e) = vault.delete(username) {
                    warn!(error = %e, "Failed to delete remembered password");
                }
            }
            Err(e) => return Err(e),
        }
    }

    let password = prompt()?;
    eprintln!("Signing in...");
    let login = catalog.login(username, &password).await?;

    if remember {
        if let Err(e) = vault.store(username, &password) {
            warn!(error = %e, "Failed to store credentials");
        }
    }

    Ok(login)
}

fn prompt_username(last_username: Option<&str>) -> Result<String> {
    match last_username {
        Some(last) => print!("Username [{}]: ", last),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_username) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

pub fn logout(catalog: &CatalogClient, config: &Config, forget: bool) -> Result<Outcome> {
    sign_out(catalog, &Keychain, config.last_username.as_deref(), forget)?;
    println!("Signed out");
    Ok(Outcome::Done)
}

fn sign_out(
    catalog: &CatalogClient,
    vault: &dyn PasswordVault,
    last_username: Option<&str>,
    forget: bool,
) -> Result<()> {
    catalog.logout()?;

    if forget {
        if let Some(username) = last_username {
            vault.delete(username)?;
        }
    }
    Ok(())
}

pub fn status(catalog: &CatalogClient) -> Outcome {
    for line in status_lines(catalog) {
        println!("{}", line);
    }
    Outcome::Done
}

fn status_lines(catalog: &CatalogClient) -> Vec<String> {
    let session = catalog.session();
    let state = session.get_state();

    let who = if session.is_authenticated() {
        match state.display_name() {
            Some(name) => format!("Signed in as {}", name),
            None => "Signed in (no profile stored)".to_string(),
        }
    } else {
        "Not signed in".to_string()
    };
    vec![who, format!("API: {}", catalog.base_url())]
}

// ============================================================================
// Catalog commands
// ============================================================================

/// Categories and products loaded side by side, like the storefront home page
pub async fn browse(catalog: &CatalogClient) -> Result<Outcome> {
    let (categories, products) =
        futures::future::try_join(catalog.categories(), catalog.products()).await?;

    let (Loaded::Data(categories), Loaded::Data(page)) = (categories, products) else {
        return Ok(Outcome::AuthRequired);
    };

    println!("Categories");
    print_categories(&categories);
    println!();
    println!("Products");
    print_products(&page, None);
    Ok(Outcome::Done)
}

pub async fn categories(catalog: &CatalogClient) -> Result<Outcome> {
    match catalog.categories().await? {
        Loaded::Data(categories) => {
            print_categories(&categories);
            Ok(Outcome::Done)
        }
        Loaded::AuthRequired => Ok(Outcome::AuthRequired),
    }
}

pub async fn products(
    catalog: &CatalogClient,
    category: Option<&str>,
    limit: Option<usize>,
) -> Result<Outcome> {
    let loaded = match category {
        Some(slug) => catalog.products_by_category(slug).await?,
        None => catalog.products().await?,
    };

    match loaded {
        Loaded::Data(page) => {
            print_products(&page, limit);
            Ok(Outcome::Done)
        }
        Loaded::AuthRequired => Ok(Outcome::AuthRequired),
    }
}

pub async fn product(catalog: &CatalogClient, id: i64) -> Result<Outcome> {
    match catalog.product(id).await? {
        Loaded::Data(product) => {
            print!("{}", product_detail(&product));
            Ok(Outcome::Done)
        }
        Loaded::AuthRequired => Ok(Outcome::AuthRequired),
    }
}

// ============================================================================
// Output
// ============================================================================

fn print_categories(categories: &[Category]) {
    let width = categories.iter().map(|c| c.slug.len()).max().unwrap_or(0);
    for category in categories {
        println!("  {:<width$}  {}", category.slug, category.name, width = width);
    }
}

fn print_products(page: &ProductsResponse, limit: Option<usize>) {
    let shown = limit.unwrap_or(page.products.len()).min(page.products.len());
    for product in page.products.iter().take(shown) {
        println!("{}", product_line(product));
    }
    if page.total as usize > shown {
        println!("({} of {} products)", shown, page.total);
    }
}

fn product_line(product: &Product) -> String {
    format!(
        "{:>4}  {:<width$}  {:>9}  {}  {}",
        product.id,
        truncate_string(&product.title, TITLE_WIDTH),
        format_price(product.discounted_price()),
        format_rating(product.rating),
        product.stock_display(),
        width = TITLE_WIDTH,
    )
}

fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", product.title));
    if let Some(ref brand) = product.brand {
        out.push_str(&format!("by {}\n", brand));
    }
    out.push('\n');

    if product.discount_percentage > 0.0 {
        out.push_str(&format!(
            "Price:    {} (was {}, {:.0}% off)\n",
            format_price(product.discounted_price()),
            format_price(product.price),
            product.discount_percentage
        ));
    } else {
        out.push_str(&format!("Price:    {}\n", format_price(product.price)));
    }
    out.push_str(&format!("Rating:   {}\n", format_rating(product.rating)));
    out.push_str(&format!("Stock:    {}\n", product.stock_display()));
    out.push_str(&format!("Category: {}\n", product.category));
    if let Some(ref shipping) = product.shipping_information {
        out.push_str(&format!("Shipping: {}\n", shipping));
    }
    if let Some(ref warranty) = product.warranty_information {
        out.push_str(&format!("Warranty: {}\n", warranty));
    }
    if let Some(ref policy) = product.return_policy {
        out.push_str(&format!("Returns:  {}\n", policy));
    }

    if !product.description.is_empty() {
        out.push_str(&format!("\n{}\n", product.description));
    }

    if !product.reviews.is_empty() {
        out.push_str(&format!(
            "\nReviews ({}, average {:.1})\n",
            product.reviews.len(),
            product.average_review_rating()
        ));
        for review in &product.reviews {
            out.push_str(&format!(
                "  {} - {} on {}\n    {}\n",
                format_rating(review.rating as f64),
                review.reviewer_name,
                format_date(&review.date),
                review.comment
            ));
        }
    }
    out
}
