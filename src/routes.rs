//! Routes

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Errors raised while parsing a route path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// No route has this path.
    #[error("unknown route: {0}")]
    Unknown(String),

    /// A parameterized route is missing its parameter.
    #[error("route {0} requires a parameter")]
    MissingParameter(&'static str),

    /// The category identifier is not a number.
    #[error("invalid category id: {0}")]
    InvalidCategoryId(String),
}

/// Navigable destinations, keyed by string path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `auth`
    Auth,

    /// `login`
    Login,

    /// `signup`
    Signup,

    /// `home`
    Home,

    /// `category-products/{categoryId}`
    CategoryProducts(u32),

    /// `product-details/{productId}`
    ProductDetails(String),

    /// `checkout`
    Checkout,

    /// `orders`
    Orders,

    /// `search`
    Search,

    /// `setting`
    Settings,

    /// `help`
    Help,
}

const CATEGORY_PRODUCTS: &str = "category-products";
const PRODUCT_DETAILS: &str = "product-details";

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.trim().trim_matches('/');

        let (head, parameter) = match path.split_once('/') {
            Some((head, parameter)) => (head, Some(parameter)),
            None => (path, None),
        };

        match (head, parameter) {
            ("auth", None) => Ok(Route::Auth),
            ("login", None) => Ok(Route::Login),
            ("signup", None) => Ok(Route::Signup),
            ("home", None) => Ok(Route::Home),
            ("checkout", None) => Ok(Route::Checkout),
            ("orders", None) => Ok(Route::Orders),
            ("search", None) => Ok(Route::Search),
            ("setting", None) => Ok(Route::Settings),
            ("help", None) => Ok(Route::Help),
            (CATEGORY_PRODUCTS, Some(id)) if !id.is_empty() => id
                .parse()
                .map(Route::CategoryProducts)
                .map_err(|_err| RouteError::InvalidCategoryId(id.to_string())),
            (PRODUCT_DETAILS, Some(id)) if !id.is_empty() && !id.contains('/') => {
                Ok(Route::ProductDetails(id.to_string()))
            }
            (CATEGORY_PRODUCTS, None | Some("")) => {
                Err(RouteError::MissingParameter(CATEGORY_PRODUCTS))
            }
            (PRODUCT_DETAILS, None | Some("")) => Err(RouteError::MissingParameter(PRODUCT_DETAILS)),
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Auth => f.write_str("auth"),
            Route::Login => f.write_str("login"),
            Route::Signup => f.write_str("signup"),
            Route::Home => f.write_str("home"),
            Route::CategoryProducts(id) => write!(f, "{CATEGORY_PRODUCTS}/{id}"),
            Route::ProductDetails(id) => write!(f, "{PRODUCT_DETAILS}/{id}"),
            Route::Checkout => f.write_str("checkout"),
            Route::Orders => f.write_str("orders"),
            Route::Search => f.write_str("search"),
            Route::Settings => f.write_str("setting"),
            Route::Help => f.write_str("help"),
        }
    }
}
