use informer_service::{calculate, CalcOutcome, Service, StdioTransport};
use std::io::Cursor;

#[test]
fn test_form_fields_with_blank_subnet() {
    let report = calculate("10.0.0.1/8", "").expect("valid CIDR");
    assert_eq!(report.network_address.to_string(), "10.0.0.0");
    assert_eq!(report.netmask.to_string(), "255.0.0.0");
    assert_eq!(report.first_usable_ip.to_string(), "10.0.0.1");
    assert_eq!(report.last_usable_ip.to_string(), "10.255.255.254");
    assert_eq!(report.num_usable_ips, 16_777_214);
}

#[test]
fn test_errors_surface_as_messages() {
    for (ip, subnet) in [
        ("999.1.1.1", "255.255.255.0"),
        ("192.168.1.5", "255.0.255.0"),
        ("192.168.1.5", ""),
        ("192.168.1.0/24/1", ""),
    ] {
        let outcome = CalcOutcome::from_inputs(ip, subnet);
        let message = outcome.error_message().expect("input should be rejected");
        assert!(message.starts_with("Invalid "), "{} / {}: {}", ip, subnet, message);
    }
}

#[test]
fn test_service_is_reusable_across_requests() {
    let service = Service::new();
    let first = service
        .handle_request(r#"{"jsonrpc":"2.0","method":"calculate","params":{"ip":"192.168.1.5","subnet":"255.255.255.0"},"id":1}"#)
        .unwrap();
    let second = service
        .handle_request(r#"{"jsonrpc":"2.0","method":"calculate","params":{"ip":"192.168.1.0/24"},"id":1}"#)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_transport_round() {
    let input = r#"{"jsonrpc":"2.0","method":"calculate","params":{"ip":"192.168.1.0/31"},"id":9}"#;
    let mut output = Vec::new();

    StdioTransport::new(Service::new())
        .run(Cursor::new(input), &mut output)
        .unwrap();

    let response: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(response["result"]["first_usable_ip"], "192.168.1.0");
    assert_eq!(response["result"]["last_usable_ip"], "192.168.1.1");
    assert_eq!(response["result"]["num_usable_ips"], 2);
}
