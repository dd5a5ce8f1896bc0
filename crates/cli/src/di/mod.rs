mod reverse_dns;

pub use reverse_dns::ReverseDnsServices;
