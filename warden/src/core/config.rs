use std::{collections::HashSet, env, path::PathBuf};

use eyre::Result;
use parking_lot::RwLock;
use warden_model::{
    marker::{GuildMarker, UserMarker},
    Id, Prefix, Prefixes,
};
use warden_store::StoreKind;
use warden_util::IntHasher;

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_OWNER_PREFIX: &str = "warden!";
pub const DEFAULT_ADMIN_PREFIX: &str = "warden.";

type IdSet<T> = HashSet<Id<T>, IntHasher>;

#[derive(Debug)]
pub struct BotConfig {
    /// Used in DMs and in guilds without own prefixes
    pub prefixes: Prefixes,
    pub owner_prefix: Prefix,
    pub admin_prefix: Prefix,
    pub owners: IdSet<UserMarker>,
    pub admins: IdSet<UserMarker>,
    pub staff: IdSet<UserMarker>,
    pub store: StoreKind,
    pub store_path: Option<PathBuf>,
    blacklist: RwLock<Blacklist>,
}

#[derive(Debug, Default)]
struct Blacklist {
    users: IdSet<UserMarker>,
    guilds: IdSet<GuildMarker>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let prefixes = env_var_opt::<Prefixes>("WARDEN_PREFIXES")?
            .filter(|prefixes| !prefixes.is_empty())
            .unwrap_or_else(|| [DEFAULT_PREFIX].into_iter().collect());

        let blacklist = Blacklist {
            users: env_var_opt::<IdList<UserMarker>>("WARDEN_BLACKLISTED_USERS")?
                .unwrap_or_default()
                .0,
            guilds: env_var_opt::<IdList<GuildMarker>>("WARDEN_BLACKLISTED_GUILDS")?
                .unwrap_or_default()
                .0,
        };

        let config = Self {
            prefixes,
            owner_prefix: env_var_opt("WARDEN_OWNER_PREFIX")?
                .unwrap_or_else(|| Prefix::from(DEFAULT_OWNER_PREFIX)),
            admin_prefix: env_var_opt("WARDEN_ADMIN_PREFIX")?
                .unwrap_or_else(|| Prefix::from(DEFAULT_ADMIN_PREFIX)),
            owners: env_var_opt::<IdList<_>>("WARDEN_OWNERS")?
                .unwrap_or_default()
                .0,
            admins: env_var_opt::<IdList<_>>("WARDEN_ADMINS")?
                .unwrap_or_default()
                .0,
            staff: env_var_opt::<IdList<_>>("WARDEN_STAFF")?
                .unwrap_or_default()
                .0,
            store: env_var_opt("WARDEN_STORE")?.unwrap_or_default(),
            store_path: env_var_opt("WARDEN_STORE_PATH")?,
            blacklist: RwLock::new(blacklist),
        };

        if config.store == StoreKind::Json && config.store_path.is_none() {
            bail!("missing env variable `WARDEN_STORE_PATH` which is required for the json store");
        }

        Ok(config)
    }

    pub fn is_blacklisted_user(&self, user: Id<UserMarker>) -> bool {
        self.blacklist.read().users.contains(&user)
    }

    pub fn is_blacklisted_guild(&self, guild: Id<GuildMarker>) -> bool {
        self.blacklist.read().guilds.contains(&guild)
    }

    /// Returns `false` if the user was already blacklisted.
    pub fn blacklist_user(&self, user: Id<UserMarker>) -> bool {
        self.blacklist.write().users.insert(user)
    }

    /// Returns `false` if the user was not blacklisted.
    pub fn unblacklist_user(&self, user: Id<UserMarker>) -> bool {
        self.blacklist.write().users.remove(&user)
    }

    pub fn blacklist_guild(&self, guild: Id<GuildMarker>) -> bool {
        self.blacklist.write().guilds.insert(guild)
    }

    pub fn unblacklist_guild(&self, guild: Id<GuildMarker>) -> bool {
        self.blacklist.write().guilds.remove(&guild)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefixes: [DEFAULT_PREFIX].into_iter().collect(),
            owner_prefix: Prefix::from(DEFAULT_OWNER_PREFIX),
            admin_prefix: Prefix::from(DEFAULT_ADMIN_PREFIX),
            owners: IdSet::default(),
            admins: IdSet::default(),
            staff: IdSet::default(),
            store: StoreKind::Memory,
            store_path: None,
            blacklist: RwLock::default(),
        }
    }
}

/// Comma separated list of ids
struct IdList<T>(IdSet<T>);

impl<T> Default for IdList<T> {
    fn default() -> Self {
        Self(IdSet::default())
    }
}

trait EnvKind: Sized {
    const EXPECTED: &'static str;

    fn from_str(s: String) -> Result<Self, String>;
}

macro_rules! env_kind {
    ($($ty:ty: |$arg:ident| $impl:block,)*) => {
        $(
            impl EnvKind for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_str($arg: String) -> Result<Self, String> {
                    $impl
                }
            }
        )*
    };
}

env_kind! {
    PathBuf: |s| { s.parse().map_err(|_| s) },
    StoreKind: |s| { s.parse().map_err(|_| s) },
}

impl EnvKind for Prefix {
    const EXPECTED: &'static str = "a non-empty prefix";

    fn from_str(s: String) -> Result<Self, String> {
        match s.trim() {
            "" => Err(s),
            prefix => Ok(Prefix::from(prefix)),
        }
    }
}

impl EnvKind for Prefixes {
    const EXPECTED: &'static str = "a comma separated list of prefixes";

    fn from_str(s: String) -> Result<Self, String> {
        Ok(s.split(',').map(str::trim).collect())
    }
}

impl<T> EnvKind for IdList<T> {
    const EXPECTED: &'static str = "a comma separated list of non-zero ids";

    fn from_str(s: String) -> Result<Self, String> {
        s.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::parse::<Id<T>>)
            .collect::<Result<_, _>>()
            .map(Self)
            .map_err(|_| s)
    }
}

fn env_var_opt<T: EnvKind>(name: &str) -> Result<Option<T>> {
    let Ok(value) = env::var(name) else {
        return Ok(None);
    };

    T::from_str(value).map(Some).map_err(|value| {
        eyre!(
            "failed to parse env variable `{name}={value}`; expected {expected}",
            expected = T::EXPECTED
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list() {
        let IdList(ids) = IdList::<UserMarker>::from_str("1, 2,,3".to_owned()).unwrap();

        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&Id::new(2)));
        assert!(IdList::<UserMarker>::from_str("1,x".to_owned()).is_err());
        assert!(IdList::<UserMarker>::from_str("0".to_owned()).is_err());
    }

    #[test]
    fn prefix_list() {
        let prefixes = Prefixes::from_str(" ?, ! ,?".to_owned()).unwrap();

        assert_eq!(&*prefixes, &["?", "!"]);
    }

    #[test]
    fn runtime_blacklist() {
        let config = BotConfig::default();
        let user = Id::new(5);

        assert!(!config.is_blacklisted_user(user));
        assert!(config.blacklist_user(user));
        assert!(!config.blacklist_user(user));
        assert!(config.is_blacklisted_user(user));
        assert!(config.unblacklist_user(user));
        assert!(!config.is_blacklisted_user(user));

        let guild = Id::new(9);
        assert!(config.blacklist_guild(guild));
        assert!(config.is_blacklisted_guild(guild));
        assert!(config.unblacklist_guild(guild));
    }

    #[test]
    fn defaults() {
        let config = BotConfig::default();

        assert_eq!(&*config.prefixes, &[DEFAULT_PREFIX]);
        assert_eq!(config.owner_prefix, DEFAULT_OWNER_PREFIX);
        assert_eq!(config.store, StoreKind::Memory);
    }
}
