//! Built-in helper catalog
//!
//! Every helper is a plain function over typed inputs, wrapped into a
//! [`HelperFn`] that routes failures through the shared [`FunctionHandler`].
//! Under a masking strategy a failing helper therefore yields the zero value
//! of its return type instead of an error.
//!
//! Helpers by category:
//! - strings: `hello`, `toString`, `trim`, `lower`, `upper`, `trunc`, `toStrings`, `regexMatch`
//! - numeric: `toInt`, `toInt64`, `toFloat64`, `toDecimal`, `biggest`, `max`, `randInt`
//! - encoding: `b64enc`, `b64dec`, `b32enc`, `b32dec`, `toJson`, `fromJson`
//! - crypto: `sha1sum`, `sha256sum`, `adler32sum`, `bcrypt`, `htpasswd`,
//!   `derivePassword`, `encryptAES`, `decryptAES`, `uuidv4`
//! - certs: `genPrivateKey`, `genCA`, `genCAWithKey`, `genSelfSignedCert`,
//!   `genSelfSignedCertWithKey`, `genSignedCert`, `genSignedCertWithKey`, `buildCustomCert`
//! - versions: `semver`, `semverCompare`
//! - network: `urlParse`, `urlJoin`, `getHostByName`
//! - dates: `toDate`, `date`, `now`
//! - collections: `list`, `tuple`, `dict`, `index`, `keys`

pub(crate) mod args;
pub mod certs;
pub mod collections;
pub mod crypto;
pub mod dates;
pub mod encoding;
pub mod network;
pub mod numeric;
pub mod strings;
pub mod versions;

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::HelperError;
use crate::handler::FunctionHandler;
use crate::registry::{FuncMap, HelperFn};

/// Wrap a typed helper body so its failures go through `handler`
///
/// A masked failure produces `T::default()`.
pub(crate) fn typed<T, F>(handler: &Arc<FunctionHandler>, name: &'static str, func: F) -> HelperFn
where
    T: Serialize + Default,
    F: Fn(&[Value]) -> Result<T, HelperError> + Send + Sync + 'static,
{
    let handler = Arc::clone(handler);
    Arc::new(move |args: &[Value]| {
        let value = handler.resolve(name, func(args))?;
        serde_json::to_value(value).map_err(|e| HelperError::message(format!("{name}: {e}")))
    })
}

/// The full built-in catalog bound to `handler`
pub fn builtin(handler: &Arc<FunctionHandler>) -> FuncMap {
    let mut funcs = FuncMap::new();
    strings::register(&mut funcs, handler);
    numeric::register(&mut funcs, handler);
    encoding::register(&mut funcs, handler);
    crypto::register(&mut funcs, handler);
    certs::register(&mut funcs, handler);
    versions::register(&mut funcs, handler);
    network::register(&mut funcs, handler);
    dates::register(&mut funcs, handler);
    collections::register(&mut funcs, handler);

    tracing::debug!(helpers = funcs.len(), strategy = %handler.strategy(), "Built-in helpers registered");
    funcs
}

/// Built-in catalog with `extensions` merged on top
pub fn func_map(handler: &Arc<FunctionHandler>, extensions: FuncMap) -> FuncMap {
    builtin(handler).merged(extensions)
}
