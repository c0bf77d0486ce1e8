//! # Shared Utility Functions
//!
//! Address formatting for display. Ethereum addresses are `0x`-prefixed
//! hex, so the prefix is kept and counted as part of the visible head.
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
//! assert_eq!(format_address(address, 6, 4), "0x7099...79C8");
//! ```

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
/// assert_eq!(format_address(addr, 6, 4), "0x7099...79C8");
/// assert_eq!(format_address(addr, 8, 6), "0x709979...dc79C8");
/// assert_eq!(format_address("0x1234", 6, 4), "0x1234");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if address_len <= prefix_len + suffix_len || !address.is_ascii() {
        return address.to_string();
    }

    // ASCII-only past this point, byte slicing is char-aligned
    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format a wallet address as `0x` plus 4 leading and 4 trailing hex digits.
///
/// # Examples
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// let addr = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
/// assert_eq!(truncate_address(addr), "0x7099...79C8");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}
