//! Common test utilities and fixtures

use solo_machine_light_client::{
    path::MerklePath, test_utils::SoloMachine, ClientConfig, SoloMachineClient,
};

pub const SEQUENCE: u64 = 3;
pub const TIMESTAMP: u64 = 100;
pub const COMMITMENT: [u8; 2] = [0xab, 0xcd];

/// Solo machine `K1` and a client trusting it at `SEQUENCE` and `TIMESTAMP`
pub struct TestContext {
    pub k1: SoloMachine,
    pub client: SoloMachineClient,
}

pub fn setup_test_context() -> TestContext {
    let k1 = SoloMachine::ed25519(1, "testing");
    let client = SoloMachineClient::new(ClientConfig::default(), k1.client_state(SEQUENCE, TIMESTAMP))
        .expect("valid client state");
    TestContext { k1, client }
}

pub fn commitment_path() -> MerklePath {
    MerklePath::new(["commitments/1"]).expect("non-empty path")
}
