use crate::logging::{init, Mode};

#[test]
fn test_init_and_reload() {
	init("info", Mode::Compact).expect("failed to init logger");
	// the subscriber is already installed, so this only swaps the filter
	init("debug,hyper=info", Mode::Json).expect("failed to reload logger");
}

#[test]
fn test_bad_filter() {
	assert!(init("microblog=loud", Mode::Default).is_err());
}

#[test]
fn test_mode_deserialize() {
	let mode: Mode = serde_json::from_str("\"pretty\"").expect("failed to parse mode");
	assert_eq!(mode, Mode::Pretty);
	assert!(serde_json::from_str::<Mode>("\"loud\"").is_err());
}
