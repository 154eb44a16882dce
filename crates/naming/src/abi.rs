use alloy_sol_types::sol;

sol! {
    /// ENS registry, holding the owner and resolver of every node.
    #[sol(rpc)]
    contract EnsRegistry {
        function owner(bytes32 node) external view returns (address);
        function resolver(bytes32 node) external view returns (address);

        /// Creates or reassigns `label` under `node`. Only callable by the owner of `node`.
        function setSubnodeOwner(bytes32 node, bytes32 label, address owner) external returns (bytes32);

        /// Points `node` at a resolver contract. Only callable by the owner of `node`.
        function setResolver(bytes32 node, address resolver) external;
    }
}
