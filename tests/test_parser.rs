use lantern::http::parser::{ParseError, parse_head, parse_http_request, parse_request};
use lantern::http::request::{InvalidRequest, Method};

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.header("Host"), Some("example.com"));
    assert_eq!(parsed.raw, req.to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_post_request_with_body() {
    let req = b"POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.path, "/api");
    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_stops_at_frame_end() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 2\r\n\r\nhiGET / HTTP/1.1\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, b"hi".to_vec());
    assert_eq!(&req[consumed..], b"GET / HTTP/1.1\r\n\r\n");
}

#[test]
fn test_parse_multiple_headers() {
    let req = b"GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.header("Host"), Some("example.com"));
    assert_eq!(parsed.header("user-agent"), Some("test-client"));
    assert_eq!(parsed.header("ACCEPT"), Some("*/*"));
}

#[test]
fn test_parse_header_values_are_trimmed() {
    let req = b"GET / HTTP/1.1\r\nX-Padded:    spaced out   \r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.header("X-Padded"), Some("spaced out"));
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let req = b"GET /search?q=rust&page=2 HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/search?q=rust&page=2");
    assert_eq!(parsed.base_path, "/search");
    assert_eq!(parsed.query_param("q"), Some("rust"));
    assert_eq!(parsed.query_param("page"), Some("2"));
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_incomplete_request_partial_body() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_invalid_content_length() {
    let req = b"GET /x HTTP/1.1\r\nContent-Length: notanumber\r\n\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Frame(_))));
}

#[test]
fn test_parse_unsupported_method() {
    let req = b"PATCH / HTTP/1.1\r\n\r\n";
    let result = parse_http_request(req);

    assert!(matches!(
        result,
        Err(ParseError::Invalid(InvalidRequest::UnsupportedMethod(_)))
    ));
}

#[test]
fn test_parse_header_without_colon_is_ignored() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\nHost: h\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.header("Host"), Some("h"));
}

#[test]
fn test_parse_supported_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} / HTTP/1.1\r\n\r\n", method_str);
        let (parsed, _) = parse_http_request(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, expected_method);
    }
}

#[test]
fn test_parse_request_with_binary_body() {
    let req = b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\n\x00\x01\x02\x03";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, vec![0, 1, 2, 3]);
}

#[test]
fn test_parse_request_is_lenient() {
    let parsed = parse_request(b"BREW /pot HTTP/1.1\r\n\r\ntea");

    assert_eq!(parsed.method, Method::Other("BREW".to_string()));
    assert_eq!(parsed.body, b"tea".to_vec());
    assert!(!parsed.is_valid());
}

#[test]
fn test_parse_head_of_garbage() {
    let parsed = parse_head(b"garbage\r\n\r\n");

    assert!(parsed.path.is_empty());
    assert_eq!(parsed.validate(), Err(InvalidRequest::MissingRequestLine));
}
