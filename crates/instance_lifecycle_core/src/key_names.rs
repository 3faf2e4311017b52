use crate::contract::DEFAULT_USERNAME;

pub const KEY_NAME_PREFIX: &str = "ec2-private-key";

pub fn key_pair_name(unix_seconds: i64) -> String {
    format!("{KEY_NAME_PREFIX}-{unix_seconds}")
}

pub fn pem_filename(key_name: &str) -> String {
    format!("{key_name}.pem")
}

pub fn ssh_command(key_name: &str, public_ip: &str) -> String {
    format!(
        "ssh -i {} {DEFAULT_USERNAME}@{public_ip}",
        pem_filename(key_name)
    )
}
