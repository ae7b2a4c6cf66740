use aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use super::args::{arity, int_arg, str_arg, stringify};
use super::typed;
use crate::errors::HelperError;
use crate::handler::FunctionHandler;
use crate::registry::FuncMap;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const BCRYPT_COST: u32 = 10;
const AES_BLOCK: usize = 16;
const MASTER_PASSWORD_SCOPE: &[u8] = b"com.lyndir.masterpassword";

const PASSWORD_TEMPLATES: [(&str, &[&str]); 6] = [
    ("maximum", &["anoxxxxxxxxxxxxxxxxx", "axxxxxxxxxxxxxxxxxno"]),
    (
        "long",
        &[
            "CvcvnoCvcvCvcv", "CvcvCvcvnoCvcv", "CvcvCvcvCvcvno", "CvccnoCvcvCvcv",
            "CvccCvcvnoCvcv", "CvccCvcvCvcvno", "CvcvnoCvccCvcv", "CvcvCvccnoCvcv",
            "CvcvCvccCvcvno", "CvcvnoCvcvCvcc", "CvcvCvcvnoCvcc", "CvcvCvcvCvccno",
            "CvccnoCvccCvcv", "CvccCvccnoCvcv", "CvccCvccCvcvno", "CvcvnoCvccCvcc",
            "CvcvCvccnoCvcc", "CvcvCvccCvccno", "CvccnoCvcvCvcc", "CvccCvcvnoCvcc",
            "CvccCvcvCvccno",
        ],
    ),
    ("medium", &["CvcnoCvc", "CvcCvcno"]),
    ("short", &["Cvcn"]),
    ("basic", &["aaanaaan", "aannaaan", "aaannaaa"]),
    ("pin", &["nnnn"]),
];

fn template_characters(class: u8) -> &'static [u8] {
    match class {
        b'V' => b"AEIOU",
        b'C' => b"BCDFGHJKLMNPQRSTVWXYZ",
        b'v' => b"aeiou",
        b'c' => b"bcdfghjklmnpqrstvwxyz",
        b'A' => b"AEIOUBCDFGHJKLMNPQRSTVWXYZ",
        b'a' => b"AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz",
        b'n' => b"0123456789",
        b'o' => b"@&%?,=[]_:-+*$#!'^~;()/.",
        _ => b"AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz0123456789!@#$%^&*()",
    }
}

pub(crate) fn register(funcs: &mut FuncMap, handler: &Arc<FunctionHandler>) {
    funcs.insert(
        "sha1sum",
        typed(handler, "sha1sum", |args| {
            arity("sha1sum", args, 1)?;
            Ok(sha1sum(&stringify(&args[0])))
        }),
    );
    funcs.insert(
        "sha256sum",
        typed(handler, "sha256sum", |args| {
            arity("sha256sum", args, 1)?;
            Ok(sha256sum(&stringify(&args[0])))
        }),
    );
    funcs.insert(
        "adler32sum",
        typed(handler, "adler32sum", |args| {
            arity("adler32sum", args, 1)?;
            Ok(adler32sum(&stringify(&args[0])))
        }),
    );
    funcs.insert(
        "bcrypt",
        typed(handler, "bcrypt", |args| {
            arity("bcrypt", args, 1)?;
            bcrypt_hash(&stringify(&args[0]))
        }),
    );
    funcs.insert(
        "htpasswd",
        typed(handler, "htpasswd", |args| {
            arity("htpasswd", args, 2)?;
            htpasswd(str_arg("htpasswd", args, 0)?, &stringify(&args[1]))
        }),
    );
    funcs.insert(
        "derivePassword",
        typed(handler, "derivePassword", |args| {
            arity("derivePassword", args, 5)?;
            let counter = int_arg("derivePassword", args, 0)?;
            let counter = u32::try_from(counter).map_err(|_| {
                HelperError::OutOfRange(format!("derivePassword: counter {counter} out of range"))
            })?;
            derive_password(
                counter,
                str_arg("derivePassword", args, 1)?,
                str_arg("derivePassword", args, 2)?,
                str_arg("derivePassword", args, 3)?,
                str_arg("derivePassword", args, 4)?,
            )
        }),
    );
    funcs.insert(
        "encryptAES",
        typed(handler, "encryptAES", |args| {
            arity("encryptAES", args, 2)?;
            Ok(encrypt_aes(str_arg("encryptAES", args, 0)?, &stringify(&args[1])))
        }),
    );
    funcs.insert(
        "decryptAES",
        typed(handler, "decryptAES", |args| {
            arity("decryptAES", args, 2)?;
            decrypt_aes(str_arg("decryptAES", args, 0)?, str_arg("decryptAES", args, 1)?)
        }),
    );
    funcs.insert(
        "uuidv4",
        typed(handler, "uuidv4", |args| {
            arity("uuidv4", args, 0)?;
            Ok(uuidv4())
        }),
    );
}

pub fn sha1sum(input: &str) -> String {
    hex::encode(Sha1::digest(input.as_bytes()))
}

pub fn sha256sum(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

pub fn uuidv4() -> String {
    Uuid::new_v4().to_string()
}

/// Adler-32 checksum as a decimal string
pub fn adler32sum(input: &str) -> String {
    adler::adler32_slice(input.as_bytes()).to_string()
}

pub fn bcrypt_hash(input: &str) -> Result<String, HelperError> {
    bcrypt::hash(input, BCRYPT_COST).map_err(|e| HelperError::message(format!("bcrypt: {e}")))
}

/// An Apache `htpasswd` line with a bcrypt hash
pub fn htpasswd(username: &str, password: &str) -> Result<String, HelperError> {
    if username.contains(':') {
        return Err(HelperError::invalid_argument(
            "htpasswd",
            format!("invalid username {username:?}: must not contain ':'"),
        ));
    }
    Ok(format!("{username}:{}", bcrypt_hash(password)?))
}

/// Deterministic site password from a master password (Master Password v3)
pub fn derive_password(
    counter: u32,
    password_type: &str,
    password: &str,
    user: &str,
    site: &str,
) -> Result<String, HelperError> {
    let templates = PASSWORD_TEMPLATES
        .iter()
        .find(|(name, _)| *name == password_type)
        .map(|(_, templates)| *templates)
        .ok_or_else(|| {
            HelperError::invalid_argument(
                "derivePassword",
                format!("cannot find password template {password_type:?}"),
            )
        })?;

    let mut salt = MASTER_PASSWORD_SCOPE.to_vec();
    salt.extend_from_slice(&length_prefix(user)?);
    salt.extend_from_slice(user.as_bytes());

    let params = scrypt::Params::new(15, 8, 2, 64)
        .map_err(|e| HelperError::message(format!("derivePassword: {e}")))?;
    let mut key = [0u8; 64];
    scrypt::scrypt(password.as_bytes(), &salt, &params, &mut key)
        .map_err(|e| HelperError::message(format!("derivePassword: {e}")))?;

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| HelperError::message(format!("derivePassword: {e}")))?;
    mac.update(MASTER_PASSWORD_SCOPE);
    mac.update(&length_prefix(site)?);
    mac.update(site.as_bytes());
    mac.update(&counter.to_be_bytes());
    let seed = mac.finalize().into_bytes();

    let template = templates[usize::from(seed[0]) % templates.len()];
    Ok(template
        .bytes()
        .zip(&seed[1..])
        .map(|(class, byte)| {
            let chars = template_characters(class);
            char::from(chars[usize::from(*byte) % chars.len()])
        })
        .collect())
}

fn length_prefix(s: &str) -> Result<[u8; 4], HelperError> {
    u32::try_from(s.len())
        .map(u32::to_be_bytes)
        .map_err(|_| HelperError::OutOfRange("derivePassword: input too long".into()))
}

/// AES-256-CBC with a random IV, base64 of `iv || ciphertext`
///
/// The key is the password's bytes, zero-padded or truncated to 32 bytes.
pub fn encrypt_aes(password: &str, plaintext: &str) -> String {
    let mut iv = [0u8; AES_BLOCK];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(&aes_key(password).into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut out = iv.to_vec();
    out.extend_from_slice(&ciphertext);
    STANDARD.encode(out)
}

pub fn decrypt_aes(password: &str, encoded: &str) -> Result<String, HelperError> {
    let data = STANDARD
        .decode(encoded)
        .map_err(|e| HelperError::Decode(e.to_string()))?;
    if data.len() < AES_BLOCK * 2 || data.len() % AES_BLOCK != 0 {
        return Err(HelperError::Decode(format!(
            "ciphertext length {} is not a whole number of blocks after the IV",
            data.len()
        )));
    }

    let (iv, ciphertext) = data.split_at(AES_BLOCK);
    let mut iv_block = [0u8; AES_BLOCK];
    iv_block.copy_from_slice(iv);

    let plaintext = Aes256CbcDec::new(&aes_key(password).into(), &iv_block.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| HelperError::Decode("bad padding, wrong password or corrupt data".into()))?;
    String::from_utf8(plaintext).map_err(|e| HelperError::Decode(e.to_string()))
}

fn aes_key(password: &str) -> [u8; 32] {
    let mut key = [0u8; 32];
    let bytes = password.as_bytes();
    let len = bytes.len().min(key.len());
    key[..len].copy_from_slice(&bytes[..len]);
    key
}
