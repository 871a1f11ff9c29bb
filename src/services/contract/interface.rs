//! Compiled interface of the wave portal contract and validation of externally supplied ABIs.
//!
//! The interface is fixed at build time; [`SCHEMA_VERSION`] changes whenever it does. An ABI
//! handed in at runtime (a raw ABI array or a build artifact carrying an `abi` field) must
//! describe every function and event the client relies on, with the same types.

use alloy::{
	json_abi::JsonAbi,
	sol,
	sol_types::{SolCall, SolEvent},
};
use std::{collections::HashMap, path::Path};

use crate::services::contract::ContractError;

/// Version of the compiled contract interface
pub const SCHEMA_VERSION: u32 = 1;

sol! {
	#[sol(rpc)]
	#[derive(Debug, PartialEq, Eq)]
	contract WavePortal {
		struct Wave {
			address waver;
			string message;
			uint256 timestamp;
		}

		event NewWave(address indexed from, uint256 timestamp, string message);

		function wave(string memory _message) public;
		function getAllWaves() public view returns (Wave[] memory);
		function getTotalWaves() public view returns (uint256);
	}
}

/// Expected `(signature, output types)` of every function the client calls
fn expected_functions() -> [(&'static str, &'static [&'static str]); 3] {
	[
		(WavePortal::waveCall::SIGNATURE, &[]),
		(
			WavePortal::getAllWavesCall::SIGNATURE,
			&["(address,string,uint256)[]"],
		),
		(WavePortal::getTotalWavesCall::SIGNATURE, &["uint256"]),
	]
}

/// Checks that `abi` describes the interface compiled into this client
pub fn validate_abi(abi: &JsonAbi) -> Result<(), ContractError> {
	for (signature, outputs) in expected_functions() {
		let function = abi
			.functions()
			.find(|f| f.signature() == signature)
			.ok_or_else(|| {
				ContractError::schema_mismatch(
					"supplied ABI is missing a function",
					None,
					Some(HashMap::from([(
						"function".to_string(),
						signature.to_string(),
					)])),
				)
			})?;

		let found: Vec<String> = function
			.outputs
			.iter()
			.map(|param| param.selector_type().into_owned())
			.collect();

		if found != outputs {
			return Err(ContractError::schema_mismatch(
				"supplied ABI declares different return types",
				None,
				Some(HashMap::from([
					("function".to_string(), signature.to_string()),
					("expected".to_string(), outputs.join(",")),
					("found".to_string(), found.join(",")),
				])),
			));
		}
	}

	let has_event = abi
		.events()
		.any(|event| event.signature() == WavePortal::NewWave::SIGNATURE && !event.anonymous);

	if !has_event {
		return Err(ContractError::schema_mismatch(
			"supplied ABI is missing an event",
			None,
			Some(HashMap::from([(
				"event".to_string(),
				WavePortal::NewWave::SIGNATURE.to_string(),
			)])),
		));
	}

	Ok(())
}

/// Parses a raw ABI array or a build artifact with an `abi` field
pub fn parse_abi(contents: &str) -> Result<JsonAbi, ContractError> {
	let value: serde_json::Value = serde_json::from_str(contents).map_err(|e| {
		ContractError::schema_mismatch("ABI file is not valid JSON", Some(Box::new(e)), None)
	})?;

	let abi_value = match value {
		serde_json::Value::Object(mut artifact) => artifact.remove("abi").ok_or_else(|| {
			ContractError::schema_mismatch("artifact has no `abi` field", None, None)
		})?,
		other => other,
	};

	serde_json::from_value(abi_value).map_err(|e| {
		ContractError::schema_mismatch("ABI does not match the JSON ABI format", Some(Box::new(e)), None)
	})
}

/// Reads, parses and validates the ABI at `path`
pub fn load_and_validate_abi(path: &Path) -> Result<JsonAbi, ContractError> {
	let contents = std::fs::read_to_string(path).map_err(|e| {
		ContractError::schema_mismatch(
			"failed to read ABI file",
			Some(Box::new(e)),
			Some(HashMap::from([(
				"path".to_string(),
				path.display().to_string(),
			)])),
		)
	})?;

	let abi = parse_abi(&contents)?;
	validate_abi(&abi)?;
	Ok(abi)
}
