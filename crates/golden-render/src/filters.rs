//! Network credential helpers
//!
//! The catalog covers Cisco type 5 (MD5-crypt) hashing and the reversible
//! type 7 obfuscation. Only the two encryption helpers are exposed to
//! secret-aware templates; see [`SECRET_RENDER_FILTERS`].

use crate::error::FilterError;
use minijinja::{Environment, Error, ErrorKind, Value};
use pwhash::md5_crypt;
use rand::Rng;

/// Every helper the catalog provides
pub const FILTER_CATALOG: [&str; 4] = [
    "compare_type7",
    "decrypt_type7",
    "encrypt_type5",
    "encrypt_type7",
];

/// Catalog members registered in the secret-aware environment
pub const SECRET_RENDER_FILTERS: [&str; 2] = ["encrypt_type5", "encrypt_type7"];

/// Longest password type 7 can encode
pub const TYPE7_MAX_PASSWORD: usize = 25;

/// Largest type 7 salt
pub const TYPE7_MAX_SALT: u8 = 15;

const TYPE7_XLAT: &[u8] = b"dsfd;kfoA,.iyewrkldJKDHSUBsgvca69834ncxv9873254k;fg87";

const CRYPT_MAGIC: &str = "$1$";
const CRYPT_ITOA64: &[u8] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const CRYPT_MAX_SALT: usize = 8;
const CRYPT_RANDOM_SALT: usize = 4;

/// Cisco type 7 encoding of `password`
///
/// A random salt in `0..=15` is used when none is given.
pub fn encrypt_type7(password: &str, salt: Option<u8>) -> Result<String, FilterError> {
    if password.len() > TYPE7_MAX_PASSWORD {
        return Err(FilterError::PasswordTooLong {
            max: TYPE7_MAX_PASSWORD,
        });
    }
    let salt = match salt {
        Some(s) if s > TYPE7_MAX_SALT => return Err(FilterError::InvalidSalt(i64::from(s))),
        Some(s) => s,
        None => rand::thread_rng().gen_range(0..=TYPE7_MAX_SALT),
    };

    let mut encoded = format!("{salt:02}");
    for (i, byte) in password.bytes().enumerate() {
        let key = TYPE7_XLAT[(usize::from(salt) + i) % TYPE7_XLAT.len()];
        encoded.push_str(&format!("{:02X}", byte ^ key));
    }
    Ok(encoded)
}

/// Recover the clear text from a type 7 string
pub fn decrypt_type7(encrypted: &str) -> Result<String, FilterError> {
    let invalid = || FilterError::InvalidEncrypted(encrypted.to_string());

    if encrypted.len() < 2 || encrypted.len() % 2 != 0 || !encrypted.is_ascii() {
        return Err(invalid());
    }
    let salt: usize = encrypted[..2].parse().map_err(|_| invalid())?;

    let mut clear = Vec::with_capacity(encrypted.len() / 2 - 1);
    for (i, start) in (2..encrypted.len()).step_by(2).enumerate() {
        let byte = u8::from_str_radix(&encrypted[start..start + 2], 16).map_err(|_| invalid())?;
        clear.push(byte ^ TYPE7_XLAT[(salt + i) % TYPE7_XLAT.len()]);
    }
    String::from_utf8(clear).map_err(|_| invalid())
}

/// Whether `encrypted` is a type 7 encoding of `password`
pub fn compare_type7(password: &str, encrypted: &str) -> bool {
    decrypt_type7(encrypted).is_ok_and(|clear| clear == password)
}

/// MD5-crypt (`$1$salt$hash`) of `password`
///
/// A random 4 character salt is used when none is given; longer salts are
/// cut at 8 characters or the first `$`.
pub fn encrypt_type5(password: &str, salt: Option<&str>) -> Result<String, FilterError> {
    let salt = match salt {
        Some(s) => crypt_salt(s).to_string(),
        None => random_crypt_salt(),
    };
    md5_crypt::hash_with(format!("{CRYPT_MAGIC}{salt}$").as_str(), password)
        .map_err(|e| FilterError::Hash(e.to_string()))
}

fn crypt_salt(salt: &str) -> &str {
    let salt = salt.strip_prefix(CRYPT_MAGIC).unwrap_or(salt);
    let salt = salt.split('$').next().unwrap_or_default();
    match salt.char_indices().nth(CRYPT_MAX_SALT) {
        Some((end, _)) => &salt[..end],
        None => salt,
    }
}

fn random_crypt_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..CRYPT_RANDOM_SALT)
        .map(|_| char::from(CRYPT_ITOA64[rng.gen_range(0..CRYPT_ITOA64.len())]))
        .collect()
}

fn filter_error(err: FilterError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string())
}

/// Register the catalog members named in `names`
///
/// Names outside the catalog are ignored. Hash output is marked safe so
/// autoescaping leaves the crypt alphabet intact. Returns how many were
/// registered.
pub fn register(env: &mut Environment<'_>, names: &[&str]) -> usize {
    let mut registered = 0;
    for name in names {
        match *name {
            "encrypt_type7" => env.add_filter("encrypt_type7", |password: String, salt: Option<i64>| {
                let salt = salt
                    .map(|s| u8::try_from(s).map_err(|_| filter_error(FilterError::InvalidSalt(s))))
                    .transpose()?;
                encrypt_type7(&password, salt)
                    .map(Value::from_safe_string)
                    .map_err(filter_error)
            }),
            "decrypt_type7" => env.add_filter("decrypt_type7", |encrypted: String| {
                decrypt_type7(&encrypted).map_err(filter_error)
            }),
            "compare_type7" => env.add_filter("compare_type7", |password: String, encrypted: String| {
                compare_type7(&password, &encrypted)
            }),
            "encrypt_type5" => env.add_filter("encrypt_type5", |password: String, salt: Option<String>| {
                encrypt_type5(&password, salt.as_deref())
                    .map(Value::from_safe_string)
                    .map_err(filter_error)
            }),
            _ => continue,
        }
        registered += 1;
    }
    registered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type7_known_vector() {
        assert_eq!(encrypt_type7("cisco", Some(7)).unwrap(), "070C285F4D06");
        assert_eq!(decrypt_type7("070C285F4D06").unwrap(), "cisco");
    }

    #[test]
    fn test_type7_random_salt_decrypts() {
        let encoded = encrypt_type7("n3tw0rk!", None).unwrap();
        let salt: u8 = encoded[..2].parse().unwrap();
        assert!(salt <= TYPE7_MAX_SALT);
        assert!(compare_type7("n3tw0rk!", &encoded));
        assert!(!compare_type7("other", &encoded));
    }

    #[test]
    fn test_type7_limits() {
        let long = "x".repeat(TYPE7_MAX_PASSWORD + 1);
        assert_eq!(
            encrypt_type7(&long, Some(1)),
            Err(FilterError::PasswordTooLong { max: 25 })
        );
        assert_eq!(encrypt_type7("abc", Some(16)), Err(FilterError::InvalidSalt(16)));
        assert!(encrypt_type7(&"x".repeat(TYPE7_MAX_PASSWORD), Some(15)).is_ok());
    }

    #[test]
    fn test_type7_rejects_garbage() {
        assert!(decrypt_type7("0").is_err());
        assert!(decrypt_type7("07ZZ").is_err());
        assert!(decrypt_type7("070C2").is_err());
        assert!(!compare_type7("cisco", "not-type7"));
    }

    #[test]
    fn test_type5_known_vector() {
        assert_eq!(
            encrypt_type5("Hello world!", Some("saltstring")).unwrap(),
            "$1$saltstri$YMyguxXMBpd2TEZ.vS/3q1"
        );
    }

    #[test]
    fn test_type5_salt_taken_from_setting_string() {
        assert_eq!(
            encrypt_type5("Hello world!", Some("$1$saltstri$ignored")).unwrap(),
            "$1$saltstri$YMyguxXMBpd2TEZ.vS/3q1"
        );
    }

    #[test]
    fn test_type5_random_salt() {
        let hashed = encrypt_type5("cisco", None).unwrap();
        let parts: Vec<&str> = hashed.split('$').collect();
        assert_eq!(parts[0], "");
        assert_eq!(parts[1], "1");
        assert_eq!(parts[2].len(), CRYPT_RANDOM_SALT);
        assert_eq!(parts[3].len(), 22);
        assert_eq!(encrypt_type5("cisco", Some(parts[2])).unwrap(), hashed);
    }

    #[test]
    fn test_register_only_known_names() {
        let mut env = Environment::new();
        assert_eq!(register(&mut env, &["encrypt_type7", "hash_everything"]), 1);
        let out = env
            .render_str("{{ 'cisco' | encrypt_type7(7) }}", minijinja::context! {})
            .unwrap();
        assert_eq!(out, "070C285F4D06");
        assert!(env.render_str("{{ 'x' | decrypt_type7 }}", minijinja::context! {}).is_err());
    }
}
