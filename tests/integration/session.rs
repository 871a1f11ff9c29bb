use crate::integration::mocks::{granted_wallet, InMemoryPortal, MockWalletCapability};
use alloy::primitives::{Address, U256};
use mockall::predicate::eq;
use std::{collections::HashSet, time::Duration};
use wave_portal_client::{
	models::{ConnectionState, ConnectionTransition, TransactionStatus},
	services::{
		session::{SessionError, WavePortalSession},
		transaction::SubmissionPolicy,
	},
	utils::tests::builders::WaveBuilder,
};

async fn settle() {
	tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_waves_from_others_arrive_live() {
	let portal = InMemoryPortal::new(U256::ZERO, U256::ZERO)
		.with_waves(vec![WaveBuilder::new().timestamp(1).message("first").build()]);
	let mut session = WavePortalSession::new(
		Some(granted_wallet(Address::repeat_byte(0xaa))),
		Some(portal.clone()),
		SubmissionPolicy::default(),
	);
	session.start().await.unwrap();

	portal.external_wave(
		WaveBuilder::new()
			.waver_byte(0xcc)
			.timestamp(2)
			.message("second")
			.build(),
	);
	settle().await;

	let messages: Vec<String> = session.waves().into_iter().map(|w| w.message).collect();
	assert_eq!(messages, vec!["second", "first"]);
}

#[tokio::test]
async fn test_disconnect_stops_live_ingestion() {
	let portal = InMemoryPortal::new(U256::ZERO, U256::ZERO);
	let mut session = WavePortalSession::new(
		Some(granted_wallet(Address::repeat_byte(0xaa))),
		Some(portal.clone()),
		SubmissionPolicy::default(),
	);
	session.start().await.unwrap();
	assert_eq!(portal.live_subscribers(), 1);

	assert_eq!(session.disconnect(), ConnectionTransition::Disconnected);
	settle().await;
	assert_eq!(portal.live_subscribers(), 0);

	portal.external_wave(WaveBuilder::new().message("after").build());
	settle().await;
	assert!(session.waves().is_empty());
}

#[tokio::test]
async fn test_reconnect_opens_single_feed() {
	let portal = InMemoryPortal::new(U256::ZERO, U256::ZERO);
	let mut session = WavePortalSession::new(
		Some(granted_wallet(Address::repeat_byte(0xaa))),
		Some(portal.clone()),
		SubmissionPolicy::default(),
	);

	session.start().await.unwrap();
	session.disconnect();
	settle().await;

	assert!(matches!(
		session.connect().await.unwrap(),
		ConnectionTransition::Connected(_)
	));
	settle().await;
	assert_eq!(portal.live_subscribers(), 1);

	portal.external_wave(WaveBuilder::new().message("again").build());
	settle().await;
	assert_eq!(session.waves().len(), 1);
}

#[tokio::test]
async fn test_declined_connect_keeps_session_disconnected() {
	let mut wallet = MockWalletCapability::new();
	wallet.expect_is_available().returning(|| true);
	wallet
		.expect_request_accounts()
		.with(eq(false))
		.returning(|_| Ok(vec![]));
	wallet
		.expect_request_accounts()
		.with(eq(true))
		.returning(|_| Ok(vec![]));
	let portal = InMemoryPortal::new(U256::ZERO, U256::ZERO);

	let mut session =
		WavePortalSession::new(Some(wallet), Some(portal.clone()), SubmissionPolicy::default());

	assert_eq!(session.start().await.unwrap(), ConnectionTransition::Unchanged);
	assert!(session.connect().await.is_err());
	assert_eq!(session.connection_state(), ConnectionState::Disconnected);
	assert_eq!(portal.live_subscribers(), 0);
}

#[tokio::test]
async fn test_concurrent_submits_send_a_single_wave() {
	let portal = InMemoryPortal::new(U256::from(10u64), U256::from(1u64)).yielding();
	let mut session = WavePortalSession::new(
		Some(granted_wallet(Address::repeat_byte(0xaa))),
		Some(portal.clone()),
		SubmissionPolicy::default(),
	);
	session.start().await.unwrap();

	let (first, second) = tokio::join!(session.submit_wave("a"), session.submit_wave("b"));

	let record = first.unwrap();
	assert!(matches!(second, Err(SessionError::TransactionInFlight(_))));
	assert_eq!(portal.submitted().len(), 1);
	assert_eq!(
		session.transaction_status(),
		TransactionStatus::Confirmed(record.handle.unwrap())
	);

	// The slot frees up once the first wave is done
	session.acknowledge_transaction();
	session.submit_wave("c").await.unwrap();
	assert_eq!(portal.submitted().len(), 2);

	settle().await;
	let messages: Vec<String> = session.waves().into_iter().map(|w| w.message).collect();
	assert_eq!(messages, vec!["c", "a"]);
}

#[tokio::test]
async fn test_submit_racing_live_push_and_refresh_converges() {
	let portal = InMemoryPortal::new(U256::from(10u64), U256::from(1u64))
		.with_waves(vec![WaveBuilder::new().timestamp(1).message("first").build()])
		.yielding();
	let mut session = WavePortalSession::new(
		Some(granted_wallet(Address::repeat_byte(0xaa))),
		Some(portal.clone()),
		SubmissionPolicy::default(),
	);
	session.start().await.unwrap();

	let theirs = WaveBuilder::new()
		.waver_byte(0xcc)
		.timestamp(5)
		.message("theirs")
		.build();
	let (record, refreshed) = tokio::join!(session.submit_wave("mine"), async {
		portal.external_wave(theirs.clone());
		session.refresh().await
	});
	record.unwrap();
	refreshed.unwrap();
	settle().await;

	let waves = session.waves();
	let messages: HashSet<String> = waves.iter().map(|w| w.message.clone()).collect();
	assert_eq!(waves.len(), 3);
	assert_eq!(
		messages,
		HashSet::from(["first".to_string(), "theirs".to_string(), "mine".to_string()])
	);
	assert_eq!(session.refresh().await.unwrap(), 0);
}
