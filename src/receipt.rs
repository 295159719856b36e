//! Receipt
//!
//! Plain-text tables for the storefront pages: catalog listings, product
//! details, the cart with its checkout summary, and order history.

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    orders::Order,
    pricing::{PricingError, discount_rate, line_total, tax_rate},
    products::Product,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Render a product listing with its "% OFF" badges.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing fails.
pub fn write_catalog(mut out: impl io::Write, products: &[&Product<'_>]) -> Result<(), ReceiptError> {
    if products.is_empty() {
        return writeln!(out, "\nNo products found.\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["", "ID", "Title", "Category", "Price", "List Price", "Offer"]);

    for (idx, product) in products.iter().enumerate() {
        let offer = match product.discount_percent() {
            0 => String::new(),
            percent => format!("{percent}% OFF"),
        };

        builder.push_record([
            format!("#{:<3}", idx + 1),
            product.id.clone(),
            product.title.clone(),
            product.category.clone(),
            format!("{}", product.price),
            format!("{}", product.list_price),
            offer,
        ]);
    }

    let mut table = builder.build();
    table.with(plain_theme());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..6), Alignment::right());
    table.modify(Columns::one(6), Color::FG_GREEN);
    table.modify(Columns::one(0), color_dark_grey());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}\n").map_err(|_err| ReceiptError::IO)
}

/// Render one product with its description and attributes.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing fails.
pub fn write_product(mut out: impl io::Write, product: &Product<'_>) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Product", product.title.as_str()]);
    builder.push_record(["ID", product.id.as_str()]);
    builder.push_record(["Category", product.category.as_str()]);
    builder.push_record(["Price".to_string(), format!("{}", product.price)]);

    if product.discount_percent() > 0 {
        builder.push_record([
            "List Price".to_string(),
            format!("{} ({}% OFF)", product.list_price, product.discount_percent()),
        ]);
    }

    for (name, value) in &product.details {
        builder.push_record([name.as_str(), value.as_str()]);
    }

    let mut table = builder.build();
    table.with(plain_theme());
    table.modify(Columns::first(), Color::BOLD);

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)?;

    if !product.description.is_empty() {
        writeln!(out, "\n{}", product.description).map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Render the cart lines followed by the checkout summary.
///
/// # Errors
///
/// - [`ReceiptError::Pricing`]: the cart could not be priced.
/// - [`ReceiptError::IO`]: writing failed.
pub fn write_cart(mut out: impl io::Write, cart: &Cart<'_>) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        return writeln!(out, "\nYour cart is empty.\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Qty", "Price", "Total"]);

    for (idx, line) in cart.lines().iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            line.product().title.clone(),
            line.quantity().to_string(),
            format!("{}", line.product().price),
            format!("{}", line_total(line)?),
        ]);
    }

    let mut table = builder.build();
    table.with(plain_theme());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());
    table.modify(Columns::one(0), color_dark_grey());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)?;

    write_cart_summary(&mut out, cart)
}

/// Render a user's order history.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing fails.
pub fn write_orders(mut out: impl io::Write, orders: &[Order]) -> Result<(), ReceiptError> {
    if orders.is_empty() {
        return writeln!(out, "\nNo orders yet.\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Date", "Status", "Items", "Address"]);

    for order in orders {
        let items = order
            .items
            .iter()
            .map(|(product, quantity)| format!("{product} x{quantity}"))
            .collect::<Vec<_>>()
            .join("\n");

        builder.push_record([
            order.id.to_string(),
            order.date.strftime("%Y-%m-%d %H:%M").to_string(),
            order.status.to_string(),
            items,
            order.address.clone(),
        ]);
    }

    let mut table = builder.build();
    table.with(plain_theme());
    table.modify(Rows::first(), Color::BOLD);

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}\n").map_err(|_err| ReceiptError::IO)
}

fn write_cart_summary(out: &mut impl io::Write, cart: &Cart<'_>) -> Result<(), ReceiptError> {
    let summary = cart.summary()?;

    let subtotal_label = " Subtotal:".to_string();
    let discount_label = format!(" Discount ({}%):", percent_points(discount_rate()));
    let tax_label = format!(" Tax ({}%):", percent_points(tax_rate()));
    let total_label = " \x1b[1mTotal:\x1b[0m".to_string();

    let subtotal_val = format!("{}  ", summary.subtotal);
    let discount_val = format!("-{}  ", summary.discount);
    let tax_val = format!("{}  ", summary.tax);
    let total_val = format!("{}  ", summary.total);

    let label_width = [&subtotal_label, &discount_label, &tax_label, &total_label]
        .into_iter()
        .map(|label| visible_width(label))
        .max()
        .unwrap_or(0);

    let value_width = [&subtotal_val, &discount_val, &tax_val, &total_val]
        .into_iter()
        .map(|value| visible_width(value))
        .max()
        .unwrap_or(0);

    write_summary_line(out, &subtotal_label, &subtotal_val, label_width, value_width)?;
    write_summary_line(out, &discount_label, &discount_val, label_width, value_width)?;
    write_summary_line(out, &tax_label, &tax_val, label_width, value_width)?;

    write_summary_line(
        out,
        &total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage to whole percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.18)
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize()
}

fn plain_theme() -> Theme {
    let mut theme = Theme::from(Style::modern_rounded());
    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')));

    theme
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
