mod mock;
mod tld;
