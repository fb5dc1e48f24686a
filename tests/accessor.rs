//! End-to-end tests for the accessor over a real config directory.

use std::fs;
use std::sync::{Arc, Mutex};

use easy_uci::{Error, Uci};
use tempfile::TempDir;

fn setup(packages: &[(&str, &str)]) -> (TempDir, Uci) {
    let dir = TempDir::new().unwrap();
    for (name, contents) in packages {
        fs::write(dir.path().join(name), contents).unwrap();
    }
    let uci = Uci::open(dir.path()).unwrap();
    (dir, uci)
}

const FIREWALL: &str = concat!(
    "config defaults\n",
    "\toption input 'ACCEPT'\n",
    "\n",
    "config zone 'lan'\n",
    "\toption masq '0'\n",
    "\n",
    "config zone 'wan'\n",
    "\toption masq '1'\n",
    "\n",
    "config zone 'guest'\n",
);

#[test]
fn test_enumerate_matches_declaration_order() {
    let (_dir, uci) = setup(&[("firewall", FIREWALL)]);
    let zones = uci.get_all_sections_of_type("firewall", "zone").unwrap();
    assert_eq!(zones, vec!["lan", "wan", "guest"]);
    assert_eq!(
        uci.get_all_sections_of_type("firewall", "redirect").unwrap(),
        Vec::<String>::new()
    );
}

#[test]
fn test_nth_agrees_with_enumeration() {
    let (_dir, uci) = setup(&[("firewall", FIREWALL)]);
    let zones = uci.get_all_sections_of_type("firewall", "zone").unwrap();
    for (i, name) in zones.iter().enumerate() {
        assert_eq!(
            &uci.get_nth_section_of_type("firewall", "zone", i as isize).unwrap(),
            name
        );
    }
    assert_eq!(
        uci.get_nth_section_of_type("firewall", "zone", -1).unwrap(),
        "guest"
    );
    assert_eq!(
        uci.get_nth_section_of_type("firewall", "zone", -3).unwrap(),
        "lan"
    );
}

#[test]
fn test_nth_out_of_range() {
    let (_dir, uci) = setup(&[("firewall", FIREWALL)]);
    for index in [3, -4, 100] {
        let err = uci
            .get_nth_section_of_type("firewall", "zone", index)
            .unwrap_err();
        assert!(matches!(err, Error::NoSuchIndex { .. }), "index {index}: {err}");
    }
}

#[test]
fn test_add_section_is_idempotent_for_same_type() {
    let (_dir, uci) = setup(&[("network", "")]);
    uci.add_section("network", "interface", Some("lan")).unwrap();
    uci.add_section("network", "interface", Some("lan")).unwrap();
    assert_eq!(
        uci.get_all_sections_of_type("network", "interface").unwrap(),
        vec!["lan"]
    );
}

#[test]
fn test_add_section_conflict_leaves_original_intact() {
    let (_dir, uci) = setup(&[("network", "")]);
    uci.add_section("network", "interface", Some("lan")).unwrap();
    let err = uci.add_section("network", "route", Some("lan")).unwrap_err();
    assert!(matches!(err, Error::TypeConflict { .. }));
    assert_eq!(uci.get_section_type("network", "lan").unwrap(), "interface");
}

#[test]
fn test_add_anonymous_section_yields_usable_name() {
    let (_dir, uci) = setup(&[("firewall", "")]);
    uci.add_section("firewall", "rule", None).unwrap();
    uci.add_section("firewall", "rule", Some("")).unwrap();

    let rules = uci.get_all_sections_of_type("firewall", "rule").unwrap();
    assert_eq!(rules.len(), 2);
    for name in &rules {
        assert_eq!(uci.get_section_type("firewall", name).unwrap(), "rule");
    }
    uci.set_option_string("firewall", &rules[0], "target", "ACCEPT")
        .unwrap();
    assert_eq!(
        uci.get_option_string("firewall", &rules[0], "target").unwrap(),
        "ACCEPT"
    );
}

#[test]
fn test_anonymous_names_survive_reopen() {
    let (dir, uci) = setup(&[("firewall", "")]);
    uci.add_section("firewall", "rule", None).unwrap();
    let before = uci.get_all_sections_of_type("firewall", "rule").unwrap();
    drop(uci);

    let reopened = Uci::open(dir.path()).unwrap();
    let after = reopened.get_all_sections_of_type("firewall", "rule").unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_delete_section_is_idempotent() {
    let (_dir, uci) = setup(&[("network", "config interface 'lan'\n")]);
    uci.delete_section("network", "missing").unwrap();
    uci.delete_section("network", "lan").unwrap();
    uci.delete_section("network", "lan").unwrap();
    assert!(matches!(
        uci.get_section_type("network", "lan").unwrap_err(),
        Error::SectionNotFound(_)
    ));
    assert!(matches!(
        uci.get_section_type("network", "missing").unwrap_err(),
        Error::SectionNotFound(_)
    ));
}

#[test]
fn test_option_string_round_trip() {
    let (_dir, uci) = setup(&[("system", "config system 'main'\n")]);
    uci.set_option_string("system", "main", "hostname", "router")
        .unwrap();
    assert_eq!(
        uci.get_option_string("system", "main", "hostname").unwrap(),
        "router"
    );

    // overwrite
    uci.set_option_string("system", "main", "hostname", "gateway")
        .unwrap();
    assert_eq!(
        uci.get_option_string("system", "main", "hostname").unwrap(),
        "gateway"
    );
}

#[test]
fn test_set_option_string_rejects_empty_value() {
    let (_dir, uci) = setup(&[("system", "config system 'main'\n")]);
    let err = uci
        .set_option_string("system", "main", "hostname", "")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(matches!(
        uci.get_option_string("system", "main", "hostname").unwrap_err(),
        Error::OptionNotFound(_)
    ));
}

#[test]
fn test_option_list_round_trip_and_append() {
    let (_dir, uci) = setup(&[("network", "config interface 'lan'\n")]);
    let values = vec!["a".to_string(), "b".to_string()];
    uci.set_option_list("network", "lan", "dns", &values).unwrap();
    assert_eq!(uci.get_option_list("network", "lan", "dns").unwrap(), values);

    uci.append_to_option_list("network", "lan", "dns", "c").unwrap();
    assert_eq!(
        uci.get_option_list("network", "lan", "dns").unwrap(),
        vec!["a", "b", "c"]
    );
}

#[test]
fn test_set_option_list_rejects_empty_list() {
    let (_dir, uci) = setup(&[("network", "config interface 'lan'\n")]);
    let err = uci.set_option_list("network", "lan", "dns", &[]).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_list_preserves_duplicates_and_empty_strings() {
    let (_dir, uci) = setup(&[("network", "config interface 'lan'\n")]);
    uci.append_to_option_list("network", "lan", "dns", "x").unwrap();
    uci.append_to_option_list("network", "lan", "dns", "").unwrap();
    uci.append_to_option_list("network", "lan", "dns", "x").unwrap();
    assert_eq!(
        uci.get_option_list("network", "lan", "dns").unwrap(),
        vec!["x", "", "x"]
    );
}

#[test]
fn test_append_upgrades_scalar_to_list() {
    let (_dir, uci) = setup(&[("network", "config interface 'lan'\n")]);
    uci.set_option_string("network", "lan", "dns", "first").unwrap();
    uci.append_to_option_list("network", "lan", "dns", "second")
        .unwrap();
    assert_eq!(
        uci.get_option_list("network", "lan", "dns").unwrap(),
        vec!["first", "second"]
    );
}

#[test]
fn test_shape_mismatch_both_directions() {
    let (_dir, uci) = setup(&[("network", "config interface 'lan'\n")]);
    uci.set_option_list("network", "lan", "dns", &["a".to_string()])
        .unwrap();
    assert!(matches!(
        uci.get_option_string("network", "lan", "dns").unwrap_err(),
        Error::NotAString(_)
    ));

    uci.set_option_string("network", "lan", "proto", "static").unwrap();
    assert!(matches!(
        uci.get_option_list("network", "lan", "proto").unwrap_err(),
        Error::NotAList(_)
    ));

    // scalar set flips a list back to scalar
    uci.set_option_string("network", "lan", "dns", "one").unwrap();
    assert_eq!(uci.get_option_string("network", "lan", "dns").unwrap(), "one");
}

#[test]
fn test_delete_option_is_idempotent() {
    let (_dir, uci) = setup(&[("system", "config system 'main'\n\toption tz 'UTC'\n")]);
    uci.delete_option("system", "main", "missing").unwrap();
    uci.delete_option("system", "missing_section", "tz").unwrap();
    uci.delete_option("system", "main", "tz").unwrap();
    uci.delete_option("system", "main", "tz").unwrap();
    assert!(matches!(
        uci.get_option_string("system", "main", "tz").unwrap_err(),
        Error::OptionNotFound(_)
    ));
}

#[test]
fn test_missing_package() {
    let (_dir, uci) = setup(&[]);
    assert!(matches!(
        uci.get_section_type("nowhere", "main").unwrap_err(),
        Error::PackageNotFound(_)
    ));
    assert!(matches!(
        uci.add_section("nowhere", "system", Some("main")).unwrap_err(),
        Error::PackageNotFound(_)
    ));
    assert!(matches!(
        uci.set_option_string("nowhere", "main", "a", "b").unwrap_err(),
        Error::PackageNotFound(_)
    ));
}

#[test]
fn test_missing_section_fails_option_writes() {
    let (_dir, uci) = setup(&[("network", "")]);
    assert!(matches!(
        uci.set_option_string("network", "lan", "proto", "static").unwrap_err(),
        Error::SectionNotFound(_)
    ));
    assert!(matches!(
        uci.append_to_option_list("network", "lan", "dns", "x").unwrap_err(),
        Error::SectionNotFound(_)
    ));
}

#[test]
fn test_failed_operation_leaves_file_untouched() {
    let (dir, uci) = setup(&[("network", "config interface 'lan'\n\toption proto 'static'\n")]);
    let path = dir.path().join("network");
    let before = fs::read_to_string(&path).unwrap();

    let _ = uci.add_section("network", "route", Some("lan")).unwrap_err();
    let _ = uci
        .set_option_string("network", "lan", "proto", "")
        .unwrap_err();
    let _ = uci.get_option_string("network", "lan", "missing").unwrap_err();

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_enumeration_has_no_cap() {
    let mut contents = String::new();
    for i in 0..1100 {
        contents.push_str(&format!("config rule 'r{i}'\n"));
    }
    let (_dir, uci) = setup(&[("firewall", &contents)]);
    let rules = uci.get_all_sections_of_type("firewall", "rule").unwrap();
    assert_eq!(rules.len(), 1100);
    assert_eq!(rules[0], "r0");
    assert_eq!(rules[1099], "r1099");
    assert_eq!(
        uci.get_nth_section_of_type("firewall", "rule", -1).unwrap(),
        "r1099"
    );
}

#[test]
fn test_error_hook_sees_each_failure() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("system"), "config system 'main'\n").unwrap();
    let uci = Uci::open(dir.path())
        .unwrap()
        .with_error_logger(move |msg| sink.lock().unwrap().push(msg.to_string()));

    let _ = uci.get_option_string("system", "main", "missing").unwrap_err();
    uci.set_option_string("system", "main", "tz", "UTC").unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("[get_option_string]"), "{}", seen[0]);
    assert!(seen[0].contains("missing"), "{}", seen[0]);
}

#[test]
fn test_values_with_awkward_characters_round_trip() {
    let (_dir, uci) = setup(&[("system", "config system 'main'\n")]);
    for value in ["it's", "a b\tc", "#hash", "\"quoted\"", "back\\slash"] {
        uci.set_option_string("system", "main", "motd", value).unwrap();
        assert_eq!(
            uci.get_option_string("system", "main", "motd").unwrap(),
            value,
            "value {value:?} did not round-trip"
        );
    }
}
