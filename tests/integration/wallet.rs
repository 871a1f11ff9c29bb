use crate::integration::mocks::MockWalletCapability;
use alloy::primitives::{address, Address};
use mockall::{predicate::eq, Sequence};
use wave_portal_client::{
	models::{ConnectionState, ConnectionTransition},
	services::wallet::{ConnectionManager, WalletError},
};

const ACCOUNT: Address = address!("0x00000000000000000000000000000000000000aa");

#[tokio::test]
async fn test_reject_then_grant() {
	let mut wallet = MockWalletCapability::new();
	let mut seq = Sequence::new();
	wallet
		.expect_request_accounts()
		.with(eq(true))
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(vec![]));
	wallet
		.expect_request_accounts()
		.with(eq(true))
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(vec![ACCOUNT]));

	let manager = ConnectionManager::new(Some(wallet));

	assert!(matches!(
		manager.request_connection().await,
		Err(WalletError::UserRejected(_))
	));
	assert_eq!(manager.state(), ConnectionState::Disconnected);

	assert_eq!(
		manager.request_connection().await.unwrap(),
		ConnectionTransition::Connected(ACCOUNT)
	);
	assert_eq!(manager.active_account(), Some(ACCOUNT));
}

#[tokio::test]
async fn test_wallet_failure_keeps_state() {
	let mut wallet = MockWalletCapability::new();
	wallet
		.expect_request_accounts()
		.returning(|_| Err(WalletError::request_failed("wallet locked", None, None)));

	let manager = ConnectionManager::new(Some(wallet));

	assert!(matches!(
		manager.restore_connection().await,
		Err(WalletError::RequestFailed(_))
	));
	assert_eq!(manager.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_capability_recovers_from_unavailable() {
	let mut wallet = MockWalletCapability::new();
	let mut seq = Sequence::new();
	wallet
		.expect_is_available()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|| false);
	wallet
		.expect_is_available()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|| true);

	let manager = ConnectionManager::new(Some(wallet));
	let mut rx = manager.subscribe();

	assert!(manager.detect_capability().await.is_err());
	assert_eq!(*rx.borrow_and_update(), ConnectionState::Unavailable);

	manager.detect_capability().await.unwrap();
	assert!(rx.has_changed().unwrap());
	assert_eq!(*rx.borrow_and_update(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_at_most_one_identity() {
	let other = Address::repeat_byte(0xbb);
	let mut wallet = MockWalletCapability::new();
	let mut seq = Sequence::new();
	wallet
		.expect_request_accounts()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(vec![ACCOUNT]));
	wallet
		.expect_request_accounts()
		.times(1)
		.in_sequence(&mut seq)
		.returning(move |_| Ok(vec![other]));

	let manager = ConnectionManager::new(Some(wallet));

	manager.request_connection().await.unwrap();
	assert_eq!(
		manager.request_connection().await.unwrap(),
		ConnectionTransition::Connected(other)
	);
	assert_eq!(manager.state(), ConnectionState::Connected(other));
}
