//! `lapakbenz`: supplier console for the LapakBenz marketplace API.
//!
//! Each command opens one view of the supplier client. The persisted
//! credential is validated once at startup, then the view's guard decides
//! whether the command may run: account screens need a session, the login and
//! registration screens need the absence of one, and the verification and
//! reset screens need the values the previous step handed over.

use std::path::PathBuf;
use std::sync::Arc;

use api::config::ConfigError;
use api::feed::{Condition, FeedFilters, ProductFeed};
use api::types::{
    ChangePasswordRequest, ForgotPasswordRequest, OrderQuery, ProductDraft, RegisterRequest, SortOrder,
};
use api::{ApiClient, ApiError, ClientConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use session::routes::{self, FLOW_PHONE, FLOW_USER_ID};
use session::{
    FileTokenStore, FlowContext, InitOutcome, LANDING_PATH, LOGIN_PATH, Navigation, Resolution, Route, Session,
    SessionInitializer, SessionSnapshot,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", .0.normalize().message)]
    Api(#[from] ApiError),
    #[error("cannot open {target}: {hint}")]
    Redirected { target: String, hint: &'static str },
    #[error("no config directory found; pass --token-file or set LAPAKBENZ_TOKEN_FILE")]
    NoConfigDir,
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "lapakbenz", about = "LapakBenz supplier console")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long, env = "LAPAKBENZ_BASE_URL")]
    base_url: Option<String>,

    /// File holding the session credential.
    #[arg(long, env = "LAPAKBENZ_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "LAPAKBENZ_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the identity behind the stored credential.
    Whoami,
    Profile,
    Register(RegisterArgs),
    Otp(OtpCommand),
    Password(PasswordCommand),
    Products(ProductsCommand),
    Orders(OrdersCommand),
    Locations(LocationsCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "type", default_value = "")]
    kind: String,
    /// Contact person.
    #[arg(long, default_value = "")]
    cp: String,
    #[arg(long, default_value = "")]
    npwp: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    province: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    district: String,
    #[arg(long, default_value = "")]
    zip: String,
    #[arg(long)]
    phone: String,
    #[arg(long, default_value = "")]
    phone2: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "LAPAKBENZ_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, default_value = "")]
    acc_name: String,
    #[arg(long, default_value = "")]
    acc_no: String,
    #[arg(long, default_value = "")]
    acc_bank: String,
}

impl From<RegisterArgs> for RegisterRequest {
    fn from(a: RegisterArgs) -> Self {
        Self {
            name: a.name,
            kind: a.kind,
            cp: a.cp,
            npwp: a.npwp,
            address: a.address,
            shipping_province: a.province,
            shipping_city: a.city,
            shipping_district: a.district,
            zip: a.zip,
            phone1: a.phone,
            phone2: a.phone2,
            email: a.email,
            password: a.password,
            acc_name: a.acc_name,
            acc_no: a.acc_no,
            acc_bank: a.acc_bank,
        }
    }
}

#[derive(Args, Debug)]
struct OtpCommand {
    #[command(subcommand)]
    command: OtpSubcommand,
}

#[derive(Subcommand, Debug)]
enum OtpSubcommand {
    /// Resend the registration OTP.
    Request {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        user_id: String,
    },
    /// Confirm a new account with the OTP it was sent.
    Verify {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        otp: String,
    },
}

#[derive(Args, Debug)]
struct PasswordCommand {
    #[command(subcommand)]
    command: PasswordSubcommand,
}

#[derive(Subcommand, Debug)]
enum PasswordSubcommand {
    /// Send a reset OTP to a registered phone number.
    Forgot {
        #[arg(long)]
        phone: String,
    },
    /// Set a new password with the OTP from `password forgot`.
    Reset {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        otp: String,
        #[arg(long, env = "LAPAKBENZ_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    Change {
        #[arg(long)]
        old_password: String,
        #[arg(long)]
        new_password: String,
    },
}

#[derive(Args, Debug)]
struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConditionArg {
    New,
    Used,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PriceOrderArg {
    Asc,
    Desc,
}

#[derive(Args, Debug)]
struct BrowseArgs {
    #[arg(long, default_value = "")]
    category: String,
    /// Repeat for several cities.
    #[arg(long = "location")]
    locations: Vec<String>,
    #[arg(long, value_enum)]
    condition: Option<ConditionArg>,
    #[arg(long, value_enum)]
    price_order: Option<PriceOrderArg>,
    /// Pages of 12 to fetch.
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

impl BrowseArgs {
    fn filters(&self) -> FeedFilters {
        FeedFilters {
            category: self.category.clone(),
            locations: self.locations.clone(),
            condition: match self.condition {
                None => Condition::Any,
                Some(ConditionArg::New) => Condition::New,
                Some(ConditionArg::Used) => Condition::Used,
            },
            price_order: self.price_order.map(|o| match o {
                PriceOrderArg::Asc => SortOrder::Asc,
                PriceOrderArg::Desc => SortOrder::Desc,
            }),
        }
    }
}

#[derive(Args, Debug)]
struct DraftArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: f64,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    stock: Option<i64>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    shortdesc: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    restricted: Option<String>,
    #[arg(long)]
    period: Option<String>,
}

impl From<DraftArgs> for ProductDraft {
    fn from(a: DraftArgs) -> Self {
        Self {
            name: a.name,
            sku: a.sku,
            price: a.price,
            stock: a.stock,
            category: a.category,
            shortdesc: a.shortdesc,
            description: a.description,
            weight: a.weight,
            restricted: a.restricted,
            period: a.period,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ProductsSubcommand {
    List(BrowseArgs),
    Search {
        text: String,
    },
    Show {
        id: String,
    },
    Categories,
    Cities,
    Create(DraftArgs),
    Update {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Upload an image file for a product.
    Image {
        id: String,
        file: PathBuf,
    },
    Publish {
        id: String,
    },
}

#[derive(Args, Debug)]
struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Subcommand, Debug)]
enum OrdersSubcommand {
    List {
        #[arg(long, default_value = "120")]
        limit: String,
        #[arg(long, default_value = "0")]
        offset: String,
        #[arg(long, default_value = "")]
        start: String,
        #[arg(long, default_value = "")]
        end: String,
        #[arg(long, default_value = "")]
        sent: String,
        #[arg(long, default_value = "")]
        delivered: String,
        #[arg(long, default_value = "")]
        paid: String,
    },
    /// Record the courier tracking number for an order.
    SetAwb {
        order_id: String,
        awb: String,
    },
}

#[derive(Args, Debug)]
struct LocationsCommand {
    #[command(subcommand)]
    command: LocationsSubcommand,
}

#[derive(Subcommand, Debug)]
enum LocationsSubcommand {
    Provinces,
    Cities { province_id: String },
    Districts { city_id: String },
}

// =============================================================================
// ROUTING
// =============================================================================

fn flow(pairs: &[(&str, &str)]) -> FlowContext {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

impl Command {
    /// The view this command runs in, with the flow context it carries.
    /// `None` for commands available in any state.
    fn destination(&self) -> Option<(Route, FlowContext)> {
        let route = match self {
            Self::Logout | Self::Locations(_) => return None,
            Self::Login { .. } => Route::Login,
            Self::Register(_) => Route::Register,
            Self::Whoami => Route::Dashboard,
            Self::Profile => Route::Profile,
            Self::Otp(otp) => match &otp.command {
                OtpSubcommand::Request { phone, user_id } | OtpSubcommand::Verify { phone, user_id, .. } => {
                    return Some((Route::Verification, flow(&[(FLOW_PHONE, phone.as_str()), (FLOW_USER_ID, user_id.as_str())])));
                }
            },
            Self::Password(password) => match &password.command {
                PasswordSubcommand::Forgot { .. } => Route::ForgotPassword,
                PasswordSubcommand::Reset { phone, .. } => {
                    return Some((Route::ResetPassword, flow(&[(FLOW_PHONE, phone.as_str())])));
                }
                PasswordSubcommand::Change { .. } => Route::Profile,
            },
            Self::Products(products) => match &products.command {
                ProductsSubcommand::List(_)
                | ProductsSubcommand::Search { .. }
                | ProductsSubcommand::Categories
                | ProductsSubcommand::Cities => Route::Products,
                ProductsSubcommand::Create(_) => Route::CreateProduct,
                ProductsSubcommand::Show { id } | ProductsSubcommand::Publish { id } => {
                    Route::ProductDetail(id.clone())
                }
                ProductsSubcommand::Update { id, .. } | ProductsSubcommand::Image { id, .. } => {
                    Route::EditProduct(id.clone())
                }
            },
            Self::Orders(_) => Route::Orders,
        };
        Some((route, FlowContext::new()))
    }
}

/// What to tell the user when a guard sends them elsewhere.
fn redirect_hint(target: &str) -> &'static str {
    match target {
        LOGIN_PATH => "not logged in; run `lapakbenz login` first",
        LANDING_PATH => "already logged in; run `lapakbenz logout` first",
        "/register" => "verification needs the --phone and --user-id from registration",
        "/forgot-password" => "password reset needs the --phone the OTP was sent to",
        _ => "this view is not available",
    }
}

/// Let the command through, or explain which guard stopped it.
fn admit(route: &Route, session: &SessionSnapshot, flow: &FlowContext) -> Result<(), CliError> {
    let path = route.path();
    match routes::resolve(&path, session, flow) {
        Resolution::Render(_) => Ok(()),
        Resolution::Redirect(target) => {
            tracing::debug!(from = %path, to = target, "guard redirect");
            Err(CliError::Redirected { target: path, hint: redirect_hint(target) })
        }
        Resolution::Loading => Err(CliError::Redirected { target: path, hint: "session is still loading" }),
    }
}

// =============================================================================
// MAIN
// =============================================================================

fn token_path(cli_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_path {
        return Ok(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join("lapakbenz").join("token"))
        .ok_or(CliError::NoConfigDir)
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring .env: {e}");
        }
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }

    let store = FileTokenStore::new(token_path(cli.token_file)?);
    tracing::debug!(path = %store.path().display(), "token store");
    let session = Session::new(Arc::new(store));

    let destination = cli.command.destination();
    let start = destination.as_ref().map_or_else(|| LANDING_PATH.to_owned(), |(route, _)| route.path());
    let navigation = Arc::new(Navigation::new(&start));
    let client = ApiClient::new(&config, session.clone(), navigation.clone())?;

    match SessionInitializer::new(session.clone()).run(&client).await {
        InitOutcome::Rejected => eprintln!("stored session was no longer valid and has been cleared"),
        outcome => tracing::debug!(?outcome, "session settled"),
    }

    if let Some((route, flow)) = &destination {
        admit(route, &session.snapshot(), flow)?;
        navigation.navigate(&route.path(), flow.clone());
    }

    let result = run(&client, cli.command).await;
    if let Err(CliError::Api(e)) = &result {
        if e.is_session_expired() {
            eprintln!("session expired; run `lapakbenz login` again");
        }
    }
    result
}

async fn run(client: &ApiClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { username, password } => {
            let outcome = client.login(&username, &password).await?;
            match outcome.user {
                Some(user) => println!("logged in as {} <{}>", user.name, user.email),
                None => println!("logged in; profile could not be loaded yet"),
            }
            Ok(())
        }
        Command::Logout => {
            client.logout().await?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => print_json(&client.session().user()),
        Command::Profile => print_json(&client.profile().await?),
        Command::Register(args) => {
            let ack = client.register(&RegisterRequest::from(args)).await?;
            print_json(&ack)
        }
        Command::Otp(otp) => run_otp(client, otp.command).await,
        Command::Password(password) => run_password(client, password.command).await,
        Command::Products(products) => run_products(client, products.command).await,
        Command::Orders(orders) => run_orders(client, orders.command).await,
        Command::Locations(locations) => {
            let places = match locations.command {
                LocationsSubcommand::Provinces => client.provinces().await?,
                LocationsSubcommand::Cities { province_id } => client.cities(&province_id).await?,
                LocationsSubcommand::Districts { city_id } => client.districts(&city_id).await?,
            };
            print_json(&places)
        }
    }
}

async fn run_otp(client: &ApiClient, command: OtpSubcommand) -> Result<(), CliError> {
    match command {
        OtpSubcommand::Request { phone, .. } => {
            client.request_otp(&phone).await?;
            println!("OTP sent to {phone}");
        }
        OtpSubcommand::Verify { user_id, otp, .. } => {
            let verification = client.verify_otp(&user_id, &otp).await?;
            if !verification.verified {
                println!("verification was not confirmed; check the code and try again");
            } else if verification.awaiting_approval {
                println!("account verified; waiting for admin approval before you can log in");
            } else {
                println!("account verified; you can now log in");
            }
        }
    }
    Ok(())
}

async fn run_password(client: &ApiClient, command: PasswordSubcommand) -> Result<(), CliError> {
    match command {
        PasswordSubcommand::Forgot { phone } => {
            client.request_otp(&phone).await?;
            println!("reset code sent; run `lapakbenz password reset --phone {phone} --otp <code>`");
        }
        PasswordSubcommand::Reset { phone, otp, new_password } => {
            let request = ForgotPasswordRequest { username: phone, new_password, otp };
            client.forgot_password(&request).await?;
            println!("password changed; you can now log in");
        }
        PasswordSubcommand::Change { old_password, new_password } => {
            client.change_password(&ChangePasswordRequest { old_password, new_password }).await?;
            println!("password changed");
        }
    }
    Ok(())
}

async fn run_products(client: &ApiClient, command: ProductsSubcommand) -> Result<(), CliError> {
    match command {
        ProductsSubcommand::List(args) => {
            let mut feed = ProductFeed::new();
            feed.set_filters(args.filters());
            feed.reload(client).await?;
            for _ in 1..args.pages {
                if !feed.load_more(client).await? {
                    break;
                }
            }
            print_json(&feed.visible())
        }
        ProductsSubcommand::Search { text } => {
            let mut feed = ProductFeed::new();
            feed.search(client, &text).await?;
            print_json(&feed.visible())
        }
        ProductsSubcommand::Show { id } => print_json(&client.product(&id).await?),
        ProductsSubcommand::Categories => print_json(&client.product_categories().await?),
        ProductsSubcommand::Cities => print_json(&client.product_cities().await?),
        ProductsSubcommand::Create(draft) => print_json(&client.add_product(&draft.into()).await?),
        ProductsSubcommand::Update { id, draft } => print_json(&client.update_product(&id, &draft.into()).await?),
        ProductsSubcommand::Image { id, file } => print_json(&client.add_product_image(&id, &file).await?),
        ProductsSubcommand::Publish { id } => print_json(&client.publish_product(&id).await?),
    }
}

async fn run_orders(client: &ApiClient, command: OrdersSubcommand) -> Result<(), CliError> {
    match command {
        OrdersSubcommand::List { limit, offset, start, end, sent, delivered, paid } => {
            let query = OrderQuery { limit, offset, start, end, sent, delivered, paid };
            print_json(&client.list_orders(&query).await?)
        }
        OrdersSubcommand::SetAwb { order_id, awb } => print_json(&client.set_awb(&order_id, &awb).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
