use std::io;

use clap::Args;

use crate::{catalog::Catalog, cli::CliError, products::Product, receipt::write_catalog};

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Only list products in this category
    #[arg(long, conflicts_with = "category_id")]
    category: Option<String>,

    /// Only list products in the category with this id
    #[arg(long)]
    category_id: Option<u32>,

    /// Only list products whose title contains this text
    #[arg(long)]
    search: Option<String>,
}

pub(crate) fn run(
    catalog: &Catalog<'_>,
    args: &CatalogArgs,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let mut products: Vec<&Product<'_>> = match (&args.category, args.category_id) {
        (Some(name), _) => catalog.by_category(name),
        (None, Some(id)) => {
            let category = catalog.category(id).ok_or(CliError::CategoryNotFound(id))?;

            writeln!(out, "\n{}", category.name)?;

            catalog.by_category_id(id)
        }
        (None, None) => catalog.products().iter().collect(),
    };

    if let Some(query) = &args.search {
        let matches = catalog.search(query);

        products.retain(|product| matches.iter().any(|found| found.id == product.id));
    }

    write_catalog(out, &products)?;

    Ok(())
}
