use fritzbox_smarthome::check_item;
use fritzbox_smarthome::discover;
use fritzbox_smarthome::CheckParams;
use fritzbox_smarthome::DeviceCategory;
use fritzbox_smarthome::Section;
use fritzbox_smarthome::State;

/// Agent output as the monitoring host hands it over: section header first,
/// the JSON document wrapped over several lines.
const AGENT_OUTPUT: &str = r#"<<<fritzbox_smarthome:sep(0)>>>
[{"id": "16", "name": "Bad", "manufacturer": "AVM", "productname": "FRITZ!DECT 301",
"present": "1", "functionbitmask": "320", "battery": "80", "batterylow": "0",
"data": {"hkr": {"tist": "41", "tsoll": "44", "battery": "80", "batterylow": "0",
"errorcode": "0", "windowopenactiv": "0", "summeractive": "0"}}},
{"id": "17", "name": "Waschmaschine", "manufacturer": "AVM", "productname": "FRITZ!DECT 200",
"present": "1", "functionbitmask": "2944", "data": {"temperature": {"celsius": "225",
"offset": "0"}, "switch": {"state": "1", "mode": "auto", "lock": "0"},
"powermeter": {"power": "0", "energy": "1500", "voltage": "231000"}}},
{"id": "406", "name": "Bewegungsmelder", "manufacturer": "0x0feb", "productname": "HAN-FUN",
"present": "1", "functionbitmask": "8200"},
{"id": "20", "name": "Wohnzimmer Taster", "manufacturer": "AVM",
"productname": "FRITZ!DECT 440", "present": "1", "functionbitmask": "1048864",
"battery": "100", "batterylow": "0", "data": {"humidity": {"rel_humidity": "65"},
"temperature": {"celsius": "215"}}},
{"id": "18", "name": "Gästezimmer", "manufacturer": "AVM", "productname": "FRITZ!DECT 301",
"present": "0", "functionbitmask": "320", "data": {"hkr": {"tist": "36", "tsoll": "253"}}}]
"#;

fn section() -> Section {
    Section::from_agent_output(AGENT_OUTPUT).expect("agent output should parse")
}

#[test]
fn test_discover_from_agent_output() {
    let services = discover(&section(), &CheckParams::default());
    let items: Vec<&str> = services.iter().map(|s| s.item.as_str()).collect();

    assert_eq!(
        items,
        [
            "Thermostat 16 Bad",
            "Switch 17 Waschmaschine",
            "Button 20 Wohnzimmer Taster",
            "Thermostat 18 Gästezimmer",
        ]
    );
    assert_eq!(services[2].category, DeviceCategory::Button);
}

#[test]
fn test_discover_with_hanfun_units() {
    let params = CheckParams {
        show_hanfun_units: true,
        ..CheckParams::default()
    };
    let services = discover(&section(), &params);

    assert_eq!(services.len(), 5);
    assert_eq!(services[2].item, "HANFUNUnit 406 Bewegungsmelder");
    assert_eq!(services[2].category, DeviceCategory::HanfunUnit);
}

#[test]
fn test_check_discovered_services() {
    let section = section();
    let params = CheckParams::default();
    let outcomes: Vec<_> = discover(&section, &params)
        .into_iter()
        .map(|service| check_item(&service.item, &params, &section))
        .collect();

    insta::assert_snapshot!(outcomes[0].render(), @"OK - AVM FRITZ!DECT 301 (Bad), Temperature: 20.5°C, Window closed, Device battery: 80% | temp_actual=20.5 battery=80;;;0;100 temp_target=22 window_open=0 battery_level=80;;;0;100");
    insta::assert_snapshot!(outcomes[1].render(), @"OK - AVM FRITZ!DECT 200 (Waschmaschine), Temperature: 22.5°C, Switch is ON (auto), Power: 0.00W, Energy: 1.50kWh, Voltage: 231.0V | temperature=22.5 switch_state=1 power=0 energy=1.5 voltage=231");
    insta::assert_snapshot!(outcomes[2].render(), @"WARN - AVM FRITZ!DECT 440 (Wohnzimmer Taster), Humidity warning: 65% (!), Temperature: 21.5°C, Device battery: 100% | humidity=65;;;0;100 temperature=21.5 battery_level=100;;;0;100");
    insta::assert_snapshot!(outcomes[3].render(), @"WARN - Device not present (!)");

    assert_eq!(
        State::worst(outcomes.iter().map(|o| o.state())),
        State::Warn
    );
}

#[test]
fn test_check_stale_item() {
    let outcome = check_item("Switch 99 Entfernt", &CheckParams::default(), &section());
    insta::assert_snapshot!(outcome.render(), @"CRIT - Device not found (!!)");
    assert_eq!(outcome.state().exit_code(), 2);
}

#[test]
fn test_malformed_agent_output() {
    let err = Section::from_agent_output("<<<fritzbox_smarthome>>>\n[{\"id\": \"16\",\n")
        .unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse device list"));
}
