use std::{io, time::Instant};

use clap::Args;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;

use crate::{
    catalog::Catalog,
    checkout::CheckoutService,
    cli::CliError,
    config::ShopConfig,
    documents::{InMemoryOrderStore, OrderStore},
    payments::SandboxPaymentGateway,
    receipt::{write_cart, write_orders},
    store::Store,
};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Product to add to the cart; repeat to add more units
    #[arg(long = "item", value_name = "PRODUCT_ID", required = true)]
    items: Vec<String>,

    /// Product to mark as a favorite before paying
    #[arg(long = "favorite", value_name = "PRODUCT_ID")]
    favorites: Vec<String>,
}

pub(crate) async fn run(
    catalog: &Catalog<'_>,
    shop: &ShopConfig,
    args: &CheckoutArgs,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let mut store = Store::new(catalog);

    for id in &args.items {
        store.add_to_cart(id)?;
    }

    for id in &args.favorites {
        store.toggle_favorite(id)?;
    }

    write_cart(&mut *out, store.cart())?;

    let payments = if shop.decline_payments {
        SandboxPaymentGateway::declining()
    } else {
        SandboxPaymentGateway::new()
    };

    let orders = InMemoryOrderStore::new();
    let mut history = orders.subscribe(&shop.user_id)?;
    orders.set_offline(shop.order_store_offline);

    let checkout = CheckoutService::new(payments, orders, shop.payment_options());

    let start = Instant::now();
    let placed = checkout.pay(&mut store, &shop.customer()).await?;
    let elapsed = start.elapsed();

    info!(order = %placed.order.id, "checkout complete");

    writeln!(
        out,
        " Order {} {} (payment {}) in {}",
        placed.order.id,
        placed.order.status,
        placed.payment_id,
        elapsed.human(Truncate::Nano),
    )?;

    if !store.favorite_items().is_empty() {
        let titles: Vec<&str> = store
            .favorite_items()
            .iter()
            .map(|product| product.title.as_str())
            .collect();

        writeln!(out, " Favorites: {}", titles.join(", "))?;
    }

    write_orders(out, &history.borrow_and_update())?;

    Ok(())
}
