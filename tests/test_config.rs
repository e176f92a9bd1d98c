use std::io::Write;

use lantern::config::{Config, ConfigError, HandlerConfig, RouteTable};

fn route<'a>(table: &'a RouteTable, prefix: &str) -> Option<&'a HandlerConfig> {
    table.iter().find(|(p, _)| *p == prefix).map(|(_, config)| config)
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml(
        r#"
port: 8080
routes:
  - path: /health
    handler: HealthHandler
  - path: /static
    handler: StaticHandler
    settings:
      root: ./public
      supported_extensions: html,css
  - path: /sleep
    handler: SleepHandler
    settings:
      sleep_seconds: 2
"#,
    )
    .unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.listen_addr(), "0.0.0.0:8080");

    let table = cfg.route_table();
    assert_eq!(table.iter().count(), 3);
    assert_eq!(route(&table, "/health"), Some(&HandlerConfig::new("HealthHandler")));

    let static_route = route(&table, "/static").unwrap();
    assert_eq!(static_route.setting("root"), Some("./public"));
    assert_eq!(static_route.setting("supported_extensions"), Some("html,css"));

    assert_eq!(route(&table, "/sleep").unwrap().setting("sleep_seconds"), Some("2"));
}

#[test]
fn test_config_custom_host() {
    let cfg = Config::from_yaml(
        "host: 127.0.0.1\nport: 3000\nroutes:\n  - path: /\n    handler: EchoHandler\n",
    )
    .unwrap();

    assert_eq!(cfg.listen_addr(), "127.0.0.1:3000");
}

#[test]
fn test_config_requires_routes() {
    let result = Config::from_yaml("port: 8080\n");
    assert!(matches!(result, Err(ConfigError::NoRoutes)));
}

#[test]
fn test_config_rejects_port_zero() {
    let result = Config::from_yaml("port: 0\nroutes:\n  - path: /\n    handler: EchoHandler\n");
    assert!(matches!(result, Err(ConfigError::MissingPort)));
}

#[test]
fn test_config_rejects_malformed_yaml() {
    assert!(matches!(
        Config::from_yaml("routes: [\n"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        Config::from_yaml("port: seventy\nroutes: []\n"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_config_rejects_nested_settings() {
    let result = Config::from_yaml(
        r#"
port: 8080
routes:
  - path: /static
    handler: StaticHandler
    settings:
      root:
        - a
        - b
"#,
    );

    match result {
        Err(ConfigError::InvalidSetting { path, setting }) => {
            assert_eq!(path, "/static");
            assert_eq!(setting, "root");
        }
        other => panic!("expected InvalidSetting, got {:?}", other),
    }
}

#[test]
fn test_duplicate_prefix_last_wins() {
    let cfg = Config::from_yaml(
        r#"
port: 8080
routes:
  - path: /a
    handler: EchoHandler
  - path: /b
    handler: HealthHandler
  - path: /a
    handler: CrudHandler
"#,
    )
    .unwrap();

    let table = cfg.route_table();
    let prefixes: Vec<&str> = table.iter().map(|(p, _)| p).collect();
    assert_eq!(prefixes, vec!["/a", "/b"]);
    assert_eq!(route(&table, "/a").unwrap().kind, "CrudHandler");
}

#[test]
fn test_route_table_builder() {
    let table = RouteTable::new()
        .with_route("/x", HandlerConfig::new("EchoHandler"))
        .with_route("/y", HandlerConfig::new("HealthHandler").with_setting("k", "v"));

    assert_eq!(route(&table, "/y").unwrap().setting("k"), Some("v"));
    assert_eq!(route(&table, "/z"), None);
}

#[test]
fn test_config_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port: 9090").unwrap();
    writeln!(file, "routes:").unwrap();
    writeln!(file, "  - path: /health").unwrap();
    writeln!(file, "    handler: HealthHandler").unwrap();

    let cfg = Config::load(file.path()).unwrap();
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.route_table().iter().count(), 1);
}

#[test]
fn test_config_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.yaml"));

    assert!(matches!(result, Err(ConfigError::Io(_))));
}
