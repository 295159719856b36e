use std::io;

use clap::Args;

use crate::{
    catalog::Catalog,
    cli::CliError,
    receipt::{write_catalog, write_product},
    routes::Route,
};

#[derive(Debug, Args)]
pub(crate) struct OpenArgs {
    /// Route path, e.g. `home`, `category-products/2` or `product-details/1-1`
    route: Route,
}

pub(crate) fn run(
    catalog: &Catalog<'_>,
    args: &OpenArgs,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    match &args.route {
        Route::Home => {
            let products: Vec<_> = catalog.products().iter().collect();

            write_catalog(out, &products)?;
        }
        Route::CategoryProducts(id) => {
            let category = catalog.category(*id).ok_or(CliError::CategoryNotFound(*id))?;

            writeln!(out, "\n{}", category.name)?;
            write_catalog(out, &catalog.by_category_id(*id))?;
        }
        Route::ProductDetails(id) => {
            let product = catalog
                .find(id)
                .ok_or_else(|| CliError::ProductNotFound(id.clone()))?;

            write_product(out, product)?;
        }
        Route::Checkout => {
            writeln!(
                out,
                "\nFill a cart and pay with `easyshop checkout --item <PRODUCT_ID>`.\n"
            )?;
        }
        Route::Orders => {
            writeln!(out, "\nOrder history is printed by `easyshop checkout` after paying.\n")?;
        }
        Route::Search => {
            writeln!(out, "\nSearch with `easyshop catalog --search <QUERY>`.\n")?;
        }
        Route::Help => {
            writeln!(out, "\nHelp & Support\n")?;
            writeln!(out, "  How to place an order?")?;
            writeln!(out, "    easyshop checkout --item <PRODUCT_ID> [--item <PRODUCT_ID>...]")?;
            writeln!(out, "  How to track my order?")?;
            writeln!(out, "    easyshop open orders\n")?;
        }
        route @ (Route::Auth | Route::Login | Route::Signup | Route::Settings) => {
            writeln!(out, "\n{route}: not available from the command line.\n")?;
        }
    }

    Ok(())
}
