use informer_cidr::{describe, normalize, Network};
use informer_core::{InvalidAddressError, UsableIp};
use ipnet::IpNet;
use std::net::IpAddr;

#[test]
fn test_usable_count_for_every_v4_prefix() {
    for n in 0u8..=32 {
        let network = normalize(&format!("203.0.113.77/{}", n), "").expect("valid prefix");
        let report = describe(&network);

        let expected = match n {
            31 => 2,
            32 => 1,
            _ => (1u128 << (32 - n)) - 2,
        };
        assert_eq!(report.num_usable_ips, expected, "prefix /{}", n);
    }
}

#[test]
fn test_first_and_last_inside_network() {
    for n in 0u8..=32 {
        let network = normalize("198.51.100.200", &n.to_string()).expect("valid prefix");
        let report = describe(&network);

        let first = report.first_usable_ip.address().expect("first usable");
        let last = report.last_usable_ip.address().expect("last usable");
        assert!(network.contains(first), "prefix /{}", n);
        assert!(network.contains(last), "prefix /{}", n);
        assert!(first <= last, "prefix /{}", n);
    }
}

#[test]
fn test_mask_and_cidr_forms_agree() {
    let from_mask = normalize("192.168.1.5", "255.255.255.0").unwrap();
    let from_cidr = normalize("192.168.1.0/24", "").unwrap();
    assert_eq!(from_mask, from_cidr);
    assert_eq!(describe(&from_mask), describe(&from_cidr));
}

#[test]
fn test_dotted_mask_matches_prefix_for_every_length() {
    for n in 0u8..=32 {
        let mask = Network::new("0.0.0.0".parse().unwrap(), n).unwrap().netmask();
        assert_eq!(
            normalize("10.20.30.40", &mask.to_string()).unwrap(),
            normalize(&format!("10.20.30.40/{}", n), "").unwrap(),
            "mask {}",
            mask
        );
    }
}

#[test]
fn test_network_fields_match_ipnet() {
    let address: IpAddr = "172.31.200.9".parse().unwrap();
    for n in 0u8..=32 {
        let network = normalize("172.31.200.9", &n.to_string()).unwrap();
        let net = IpNet::new(address, n).unwrap().trunc();

        assert_eq!(network.address(), net.network(), "prefix /{}", n);
        assert_eq!(network.netmask(), net.netmask(), "prefix /{}", n);
        assert_eq!(network.hostmask(), net.hostmask(), "prefix /{}", n);
        assert_eq!(network.broadcast(), net.broadcast(), "prefix /{}", n);
    }
}

#[test]
fn test_mask_field_uses_ipv4_bounds_for_ipv6() {
    assert!(matches!(
        normalize("2001:db8::1", "64"),
        Err(InvalidAddressError::PrefixLength(_))
    ));
    assert!(normalize("2001:db8::1", "120").is_err());
    assert_eq!(
        normalize("2001:db8::1", "32").unwrap(),
        normalize("2001:db8::/32", "").unwrap()
    );
    assert_eq!(
        normalize("2001:db8::1", "255.255.0.0").unwrap().to_string(),
        "2001::/16"
    );
}

#[test]
fn test_rejected_inputs() {
    assert!(matches!(
        normalize("192.168.1.5", "255.0.255.0"),
        Err(InvalidAddressError::Mask(_))
    ));
    assert!(matches!(
        normalize("999.1.1.1", "255.255.255.0"),
        Err(InvalidAddressError::Address(_))
    ));
    assert!(matches!(
        normalize("999.1.1.1/24", ""),
        Err(InvalidAddressError::Address(_))
    ));
    assert!(matches!(
        normalize("10.0.0.0/33", ""),
        Err(InvalidAddressError::PrefixLength(_))
    ));
    assert!(matches!(
        normalize("10.0.0.0/8/16", ""),
        Err(InvalidAddressError::Notation(_))
    ));
}

#[test]
fn test_slash_31_report() {
    let report = describe(&normalize("192.168.1.0/31", "").unwrap());
    assert_eq!(report.network_address.to_string(), "192.168.1.0");
    assert_eq!(report.netmask.to_string(), "255.255.255.254");
    assert_eq!(report.first_usable_ip.to_string(), "192.168.1.0");
    assert_eq!(report.last_usable_ip.to_string(), "192.168.1.1");
    assert_eq!(report.num_usable_ips, 2);
    assert_ne!(report.first_usable_ip, UsableIp::NotApplicable);
}

#[test]
fn test_report_json_shape() {
    let report = describe(&normalize("10.0.0.1/8", "").unwrap());
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["network_address"], "10.0.0.0");
    assert_eq!(value["netmask"], "255.0.0.0");
    assert_eq!(value["first_usable_ip"], "10.0.0.1");
    assert_eq!(value["last_usable_ip"], "10.255.255.254");
    assert_eq!(value["num_usable_ips"], 16_777_214);
}
