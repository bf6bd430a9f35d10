//! Proof responses handed to clients

use crate::core::{error::*, types::*};
use crate::proofs::proof::Proof;
use crate::proofs::verify::verify_proof;
use serde::{Deserialize, Serialize};

/// A membership proof for one segment together with the root it commits to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofResponse {
    /// File the segment belongs to
    pub file: String,
    /// Leaf index of the segment
    pub leaf_index: usize,
    /// Root of the file's tree when the proof was generated
    pub root: RootHash,
    /// Proof path, leaf digest first
    pub proof: Proof,
}

impl ProofResponse {
    /// Verify the proof against the root it carries
    pub fn verify(&self) -> Result<bool> {
        verify_proof(&self.root, &self.proof)
    }

    /// Verify the proof against a root obtained out of band
    pub fn verify_against(&self, trusted_root: &RootHash) -> Result<bool> {
        verify_proof(trusted_root, &self.proof)
    }

    /// Digest of the proven leaf
    pub fn leaf_hash(&self) -> Option<LeafHash> {
        self.proof.first().map(|element| element.hash)
    }

    /// Serialize response to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(SegstoreError::JsonSerialization)
    }

    /// Deserialize response from JSON. Digests of the wrong width or an empty
    /// path are reported as a malformed proof.
    pub fn from_json(json: &str) -> Result<Self> {
        let response: ProofResponse = serde_json::from_str(json)
            .map_err(|e| SegstoreError::malformed_proof(e.to_string()))?;
        if response.proof.is_empty() {
            return Err(SegstoreError::malformed_proof("proof has no elements"));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proofs::merkle::MerkleTree;

    fn response_for(index: usize) -> ProofResponse {
        let mut tree = MerkleTree::from_leaves(["one", "two", "three"]);
        let root = tree.build().unwrap();
        ProofResponse {
            file: "report".to_string(),
            leaf_index: index,
            root,
            proof: tree.generate_proof(index).unwrap(),
        }
    }

    #[test]
    fn test_json_roundtrip_verifies() {
        let response = response_for(2);
        let decoded = ProofResponse::from_json(&response.to_json().unwrap()).unwrap();
        assert_eq!(decoded, response);
        assert!(decoded.verify().unwrap());
    }

    #[test]
    fn test_json_uses_hex_and_position_names() {
        let json = response_for(0).to_json().unwrap();
        assert!(json.contains("\"position\": \"Right\""));
        assert!(json.contains("\"leaf_index\": 0"));
    }

    #[test]
    fn test_short_digest_is_malformed() {
        let response = response_for(1);
        let mut value: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        value["proof"][1]["hash"] = serde_json::Value::String("abcd".to_string());

        assert!(matches!(
            ProofResponse::from_json(&value.to_string()),
            Err(SegstoreError::EmptyOrMalformedProof { .. })
        ));
    }

    #[test]
    fn test_empty_path_is_malformed() {
        let mut response = response_for(0);
        response.proof.clear();
        let json = serde_json::to_string(&response).unwrap();
        assert!(matches!(
            ProofResponse::from_json(&json),
            Err(SegstoreError::EmptyOrMalformedProof { .. })
        ));
    }
}
