use sha2::{Digest, Sha256};

/// Builds the avatar URL for an email address.
///
/// Gravatar keys avatars by the hash of the trimmed, lowercased address and
/// falls back to the generic silhouette (`d=mm`) for unknown addresses.
pub fn url(email: &str) -> String {
	let hash = Sha256::digest(email.trim().to_lowercase().as_bytes());

	format!("https://www.gravatar.com/avatar/{hash:x}?s=200&r=pg&d=mm")
}
