use super::*;
use session::{Credential, UserIdentity};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("lapakbenz").chain(args.iter().copied())).unwrap()
}

fn snapshot(logged_in: bool) -> SessionSnapshot {
    SessionSnapshot {
        token: logged_in.then(|| Credential::new("tok").unwrap()),
        user: logged_in.then(|| UserIdentity {
            id: "5".into(),
            name: "Sup".into(),
            email: "sup@lapakbenz.test".into(),
            phone: String::new(),
            verified: true,
        }),
        is_loading: false,
        generation: 1,
    }
}

fn gate(args: &[&str], logged_in: bool) -> Result<(), CliError> {
    let cli = parse(args);
    let (route, flow) = cli.command.destination().unwrap();
    admit(&route, &snapshot(logged_in), &flow)
}

// =============================================================
// Destinations
// =============================================================

#[test]
fn commands_map_to_views() {
    let cases: &[(&[&str], Route)] = &[
        (&["login", "--username", "a", "--password", "b"], Route::Login),
        (&["whoami"], Route::Dashboard),
        (&["products", "list"], Route::Products),
        (&["products", "create", "--name", "Pad", "--price", "10"], Route::CreateProduct),
        (&["products", "show", "9"], Route::ProductDetail("9".into())),
        (&["products", "image", "9", "pad.jpg"], Route::EditProduct("9".into())),
        (&["orders", "set-awb", "4", "JNE123"], Route::Orders),
        (&["password", "change", "--old-password", "a", "--new-password", "bbbbbb"], Route::Profile),
    ];
    for (args, expected) in cases {
        let (route, _) = parse(args).command.destination().unwrap();
        assert_eq!(&route, expected, "{args:?}");
    }
}

#[test]
fn logout_and_locations_run_anywhere() {
    assert!(parse(&["logout"]).command.destination().is_none());
    assert!(parse(&["locations", "cities", "31"]).command.destination().is_none());
}

#[test]
fn verification_carries_flow_context() {
    let cli = parse(&["otp", "verify", "--phone", "0812", "--user-id", "77", "--otp", "1234"]);
    let (route, flow) = cli.command.destination().unwrap();
    assert_eq!(route, Route::Verification);
    assert_eq!(flow.get(FLOW_PHONE).map(String::as_str), Some("0812"));
    assert_eq!(flow.get(FLOW_USER_ID).map(String::as_str), Some("77"));
}

// =============================================================
// Guards
// =============================================================

#[test]
fn protected_commands_need_a_session() {
    let err = gate(&["orders", "list"], false).unwrap_err();
    assert!(err.to_string().contains("lapakbenz login"), "{err}");
    assert!(gate(&["orders", "list"], true).is_ok());
}

#[test]
fn guest_commands_refuse_a_session() {
    let err = gate(&["login", "--username", "a", "--password", "b"], true).unwrap_err();
    assert!(err.to_string().contains("logout"), "{err}");
    assert!(gate(&["password", "forgot", "--phone", "0812"], false).is_ok());
}

#[test]
fn blank_flow_values_send_back_to_entry() {
    let err = gate(&["password", "reset", "--phone", " ", "--otp", "1", "--new-password", "secret1"], false)
        .unwrap_err();
    assert!(matches!(err, CliError::Redirected { hint, .. } if hint.contains("--phone")));

    let err = gate(&["otp", "verify", "--phone", "0812", "--user-id", "", "--otp", "1"], false).unwrap_err();
    assert!(err.to_string().contains("registration"), "{err}");
}

// =============================================================
// Arguments
// =============================================================

#[test]
fn browse_args_become_feed_filters() {
    let cli = parse(&[
        "products", "list", "--location", "Bandung", "--location", "Depok", "--condition", "used", "--price-order",
        "asc",
    ]);
    let Command::Products(ProductsCommand { command: ProductsSubcommand::List(args) }) = cli.command else {
        panic!("expected products list");
    };
    let filters = args.filters();
    assert_eq!(filters.locations, vec!["Bandung".to_owned(), "Depok".to_owned()]);
    assert_eq!(filters.condition, Condition::Used);
    assert_eq!(filters.price_order, Some(SortOrder::Asc));
    assert_eq!(args.pages, 1);
}

#[test]
fn explicit_token_file_wins() {
    let path = token_path(Some(PathBuf::from("/tmp/lapakbenz-token"))).unwrap();
    assert_eq!(path, PathBuf::from("/tmp/lapakbenz-token"));
}

#[test]
fn api_errors_display_normalized_message() {
    let err = CliError::from(ApiError::SessionExpired { endpoint: "order_list" });
    assert_eq!(err.to_string(), "Your session has expired. Please login again.");
}
