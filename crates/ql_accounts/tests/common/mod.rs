//! Scripted authentication servers for the integration tests.
//!
//! Each mock records the name of every call it receives and answers
//! with the next scripted reply for that method. A call with nothing
//! scripted fails with a transport error.

#![allow(dead_code)]

use async_trait::async_trait;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicI64, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use ql_accounts::{
    AccessToken, Account, AccountDatabase, AccountManager, AccountStore, Clock, GameProfile,
    GameToken, MemoryAccountStore, MicrosoftAuth, MicrosoftErrorCode, MicrosoftToken, MojangAuth,
    MojangErrorCode, MojangSession, ProviderError, ProviderResult, SecureString, XblToken,
    XstsToken,
};
use ql_core::{IoError, JsonFileError};

pub struct Script<T, C>(Mutex<VecDeque<ProviderResult<T, C>>>);

impl<T, C> Default for Script<T, C> {
    fn default() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }
}

impl<T, C> Script<T, C> {
    pub fn ok(&self, value: T) {
        self.0.lock().unwrap().push_back(Ok(value));
    }

    pub fn reported(&self, code: C) {
        self.0
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Reported(code)));
    }

    pub fn transport(&self) {
        self.0
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Transport("connection refused".into())));
    }

    fn next(&self) -> ProviderResult<T, C> {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Transport("no scripted reply".into())))
    }
}

#[derive(Default)]
pub struct MockMojang {
    calls: Mutex<Vec<&'static str>>,
    pub authenticate: Script<MojangSession, MojangErrorCode>,
    pub validate: Script<bool, MojangErrorCode>,
    pub invalidate: Script<(), MojangErrorCode>,
    pub refresh: Script<MojangSession, MojangErrorCode>,
}

impl MockMojang {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MojangAuth for MockMojang {
    async fn authenticate(
        &self,
        _username: &str,
        _password: &SecureString,
        _client_token: Option<&str>,
    ) -> ProviderResult<MojangSession, MojangErrorCode> {
        self.record("authenticate");
        self.authenticate.next()
    }

    async fn validate(
        &self,
        _access_token: &AccessToken,
        _client_token: Option<&str>,
    ) -> ProviderResult<bool, MojangErrorCode> {
        self.record("validate");
        self.validate.next()
    }

    async fn invalidate(
        &self,
        _access_token: &AccessToken,
        _client_token: Option<&str>,
    ) -> ProviderResult<(), MojangErrorCode> {
        self.record("invalidate");
        self.invalidate.next()
    }

    async fn refresh(
        &self,
        _access_token: &AccessToken,
        _client_token: Option<&str>,
    ) -> ProviderResult<MojangSession, MojangErrorCode> {
        self.record("refresh");
        self.refresh.next()
    }
}

#[derive(Default)]
pub struct MockMicrosoft {
    calls: Mutex<Vec<&'static str>>,
    /// Microsoft access tokens passed to `get_xbl_token`.
    pub xbl_inputs: Mutex<Vec<String>>,
    pub entry_code: Script<MicrosoftToken, MicrosoftErrorCode>,
    pub refresh_token: Script<MicrosoftToken, MicrosoftErrorCode>,
    pub xbl: Script<XblToken, MicrosoftErrorCode>,
    pub xsts: Script<XstsToken, MicrosoftErrorCode>,
    pub game: Script<GameToken, MicrosoftErrorCode>,
    pub profile: Script<GameProfile, MicrosoftErrorCode>,
}

impl MockMicrosoft {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    /// Scripts the Xbox Live, XSTS, game token and profile steps.
    pub fn script_chain(&self, game_token: &str, expires_in: i64, profile: GameProfile) {
        self.xbl.ok(XblToken {
            token: AccessToken::new("xbl-token-abcdef"),
            uhs: "uhs".to_owned(),
        });
        self.xsts.ok(XstsToken {
            token: AccessToken::new("xsts-token-abcdef"),
            uhs: "uhs".to_owned(),
        });
        self.game.ok(GameToken {
            access_token: AccessToken::new(game_token),
            expires_in,
        });
        self.profile.ok(profile);
    }
}

#[async_trait]
impl MicrosoftAuth for MockMicrosoft {
    async fn exchange_entry_code(
        &self,
        _code: &str,
    ) -> ProviderResult<MicrosoftToken, MicrosoftErrorCode> {
        self.record("exchange_entry_code");
        self.entry_code.next()
    }

    async fn exchange_refresh_token(
        &self,
        _refresh_token: &AccessToken,
    ) -> ProviderResult<MicrosoftToken, MicrosoftErrorCode> {
        self.record("exchange_refresh_token");
        self.refresh_token.next()
    }

    async fn get_xbl_token(
        &self,
        ms_access_token: &AccessToken,
    ) -> ProviderResult<XblToken, MicrosoftErrorCode> {
        self.record("get_xbl_token");
        self.xbl_inputs
            .lock()
            .unwrap()
            .push(ms_access_token.as_str().to_owned());
        self.xbl.next()
    }

    async fn get_xsts_token(
        &self,
        _xbl: &XblToken,
    ) -> ProviderResult<XstsToken, MicrosoftErrorCode> {
        self.record("get_xsts_token");
        self.xsts.next()
    }

    async fn get_game_token(
        &self,
        _xsts: &XstsToken,
    ) -> ProviderResult<GameToken, MicrosoftErrorCode> {
        self.record("get_game_token");
        self.game.next()
    }

    async fn get_profile(
        &self,
        _game_token: &AccessToken,
    ) -> ProviderResult<GameProfile, MicrosoftErrorCode> {
        self.record("get_profile");
        self.profile.next()
    }
}

pub struct FixedClock(pub AtomicI64);

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self(AtomicI64::new(now_ms))
    }

    pub fn set(&self, now_ms: i64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn profile(id: &str, name: &str) -> GameProfile {
    GameProfile {
        id: id.to_owned(),
        name: name.to_owned(),
    }
}

pub fn ms_token(access: &str, refresh: &str, expires_in: i64) -> MicrosoftToken {
    MicrosoftToken {
        access_token: AccessToken::new(access),
        refresh_token: AccessToken::new(refresh),
        expires_in,
    }
}

/// A store whose saves always fail, as on a read-only disk.
pub struct ReadOnlyStore(pub MemoryAccountStore);

#[async_trait]
impl AccountStore for ReadOnlyStore {
    fn get(&self, uuid: &str) -> Option<&Account> {
        self.0.get(uuid)
    }

    fn accounts(&self) -> Vec<&Account> {
        self.0.accounts()
    }

    fn upsert(&mut self, account: Account) -> Account {
        self.0.upsert(account)
    }

    fn remove(&mut self, uuid: &str) -> Option<Account> {
        self.0.remove(uuid)
    }

    fn selected(&self) -> Option<&Account> {
        self.0.selected()
    }

    fn set_selected(&mut self, uuid: &str) -> bool {
        self.0.set_selected(uuid)
    }

    fn client_token(&self) -> Option<&str> {
        self.0.client_token()
    }

    fn set_client_token(&mut self, token: String) {
        self.0.set_client_token(token);
    }

    async fn persist(&self) -> Result<(), JsonFileError> {
        Err(IoError {
            error: std::io::Error::other("read-only file system"),
            path: "accounts.json".into(),
        }
        .into())
    }
}

/// An [`AccountManager`] wired to fresh mocks, plus handles to inspect them.
pub struct Harness {
    pub manager: AccountManager,
    pub mojang: Arc<MockMojang>,
    pub microsoft: Arc<MockMicrosoft>,
    pub clock: Arc<FixedClock>,
    persists: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_database(AccountDatabase::default())
    }

    pub fn with_database(db: AccountDatabase) -> Self {
        let store = MemoryAccountStore::with_database(db);
        let persists = store.persist_counter();
        Self::build(Box::new(store), persists)
    }

    /// Every save fails; [`Harness::persist_count`] stays at zero.
    pub fn read_only(db: AccountDatabase) -> Self {
        let store = ReadOnlyStore(MemoryAccountStore::with_database(db));
        Self::build(Box::new(store), Arc::default())
    }

    fn build(store: Box<dyn AccountStore>, persists: Arc<AtomicUsize>) -> Self {
        ql_core::print::set_print(false);

        let mojang = Arc::new(MockMojang::default());
        let microsoft = Arc::new(MockMicrosoft::default());
        let clock = Arc::new(FixedClock::new(1_000_000));

        let manager = AccountManager::new(store, mojang.clone(), microsoft.clone())
            .with_clock(clock.clone());
        Self {
            manager,
            mojang,
            microsoft,
            clock,
            persists,
        }
    }

    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}
