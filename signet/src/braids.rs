use aliri_braid::braid;
use std::fmt;

/// The identifier of a project registered with the authentication service
#[braid(serde)]
pub struct ProjectId;

/// The identifier of a user account
#[braid(serde)]
pub struct UserId;

/// The identifier of a session
#[braid(serde)]
pub struct SessionId;

/// The secret of an active session, as presented by the browser
#[braid(serde, debug = "owned", display = "owned")]
pub struct SessionSecret;

const HIDDEN: &str = "***SESSION SECRET***";

impl fmt::Debug for SessionSecretRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(HIDDEN)
    }
}

impl fmt::Display for SessionSecretRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(HIDDEN)
    }
}
